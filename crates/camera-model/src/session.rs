//! Authenticated session state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The cookie set returned by a successful login.
///
/// Created once per invocation and passed explicitly to every camera
/// service call. Serializes as a flat `name -> value` map, which is also
/// the on-disk cache format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    pub fn from_cookies<I, K, V>(cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cookies: cookies
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Value for a `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_is_sorted_and_joined() {
        let session = Session::from_cookies([("website_2", "abc"), ("sessionid", "xyz")]);
        assert_eq!(session.cookie_header(), "sessionid=xyz; website_2=abc");
        assert!(!session.is_empty());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let session = Session::from_cookies([("sessionid", "xyz")]);
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(json, r#"{"sessionid":"xyz"}"#);

        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
