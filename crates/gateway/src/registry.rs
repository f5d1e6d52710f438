use std::collections::HashMap;

use {
    herald_channels::ChannelKind,
    herald_config::{Address, HeraldConfig},
    tracing::warn,
};

/// Address book, built once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct AddressRegistry {
    addresses: HashMap<String, Address>,
}

impl AddressRegistry {
    pub fn new(addresses: HashMap<String, Address>) -> Self {
        for (name, address) in &addresses {
            for id in &address.enabled_channels {
                if id.parse::<ChannelKind>().is_err() {
                    warn!(address = %name, channel = %id, "unknown channel will be ignored");
                }
            }
        }
        Self { addresses }
    }

    pub fn from_config(config: &HeraldConfig) -> Self {
        Self::new(config.addresses.clone())
    }

    pub fn lookup(&self, name: &str) -> Option<&Address> {
        self.addresses.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.addresses.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
