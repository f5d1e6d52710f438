//! Inbound notification request parsing.

use std::borrow::Cow;

use {axum::http::Method, herald_channels::Overrides, url::form_urlencoded};

/// Fields of one inbound notification request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchRequest {
    pub address: Option<String>,
    pub overrides: Overrides,
}

impl DispatchRequest {
    /// Collect fields from the query string and an optional
    /// `application/x-www-form-urlencoded` body.
    ///
    /// Body values win over query values; for repeated keys the first value
    /// wins.
    pub fn from_form(query: Option<&str>, form_body: Option<&[u8]>) -> Self {
        let mut req = Self::default();
        if let Some(body) = form_body {
            req.fill(form_urlencoded::parse(body));
        }
        if let Some(query) = query {
            req.fill(form_urlencoded::parse(query.as_bytes()));
        }
        req
    }

    /// Collect fields from the query string and the text fields of a
    /// `multipart/form-data` body.
    ///
    /// Query values win over multipart values; for repeated keys the first
    /// value wins.
    pub fn from_multipart(query: Option<&str>, fields: Vec<(String, String)>) -> Self {
        let mut req = Self::default();
        if let Some(query) = query {
            req.fill(form_urlencoded::parse(query.as_bytes()));
        }
        req.fill(
            fields
                .into_iter()
                .map(|(key, value)| (Cow::Owned(key), Cow::Owned(value))),
        );
        req
    }

    /// The requested address name, if present and non-empty.
    pub fn address_name(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }

    fn fill<'a>(&mut self, pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>) {
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "address" => &mut self.address,
                "message" => &mut self.overrides.message,
                "sender" => &mut self.overrides.sender,
                "subject" => &mut self.overrides.subject,
                "body" => &mut self.overrides.body,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
    }
}

/// True for `application/x-www-form-urlencoded` content types, parameters
/// ignored.
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// True for `multipart/form-data` content types, parameters ignored.
pub fn is_multipart_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Url-encoded bodies carry form fields only for these methods.
pub fn reads_form_body(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH].contains(method)
}

/// Lexically normalise a request path: collapse repeated slashes, drop `.`
/// segments, resolve `..` and strip any trailing slash.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}
