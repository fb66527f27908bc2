use std::collections::HashSet;

use serde::{Deserialize, Deserializer};
use url::Url;
use uuid::Uuid;

/// 生成新的条目 ID
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fill a blank id, or replace one already in `taken`, then claim it.
pub(crate) fn claim_id(id: &mut String, taken: &mut HashSet<String>) {
    if id.is_empty() || taken.contains(id.as_str()) {
        *id = generate_id();
    }
    taken.insert(id.clone());
}

/// Whether the subscription url is something the remote service can resolve.
pub fn is_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// `null` and missing values both become `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Number of `page_size` pages needed for `len` items.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_detection() {
        assert!(is_http_url("https://example.com/sub?token=1"));
        assert!(is_http_url("http://10.0.0.1:8080/api"));
        assert!(!is_http_url("ss://YWVzLTI1Ni1nY206cGFzcw@1.2.3.4:8388"));
        assert!(!is_http_url("ftp://example.com/list"));
        assert!(!is_http_url("not a url"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn claimed_ids_never_collide() {
        let mut taken = HashSet::new();
        let mut first = "dup".to_string();
        let mut second = "dup".to_string();
        let mut blank = String::new();
        claim_id(&mut first, &mut taken);
        claim_id(&mut second, &mut taken);
        claim_id(&mut blank, &mut taken);
        assert_eq!(first, "dup");
        assert_ne!(second, "dup");
        assert!(!blank.is_empty());
        assert_eq!(taken.len(), 3);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 24), 0);
        assert_eq!(page_count(1, 24), 1);
        assert_eq!(page_count(24, 24), 1);
        assert_eq!(page_count(25, 24), 2);
        assert_eq!(page_count(13, 6), 3);
    }
}
