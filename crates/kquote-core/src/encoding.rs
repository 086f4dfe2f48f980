//! Legacy Korean text decoding for listing pages.

use std::borrow::Cow;

use encoding_rs::EUC_KR;

/// Decodes EUC-KR (CP949) bytes into UTF-8.
///
/// Malformed sequences become U+FFFD so that one bad row never costs a whole page.
pub fn decode_euc_kr(bytes: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = EUC_KR.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!(len = bytes.len(), "replaced malformed EUC-KR sequences");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_company_name() {
        let bytes = [0xbb, 0xef, 0xbc, 0xba, 0xc0, 0xfc, 0xc0, 0xda];
        assert_eq!(decode_euc_kr(&bytes), "삼성전자");
    }

    #[test]
    fn ascii_passes_through_unchanged() {
        let html = br#"<a href="/item/main.naver?code=005930" class="tltle">"#;
        assert_eq!(decode_euc_kr(html), String::from_utf8_lossy(html));
    }

    #[test]
    fn malformed_bytes_are_replaced() {
        let bytes = [b'A', 0xff, b'B'];
        let text = decode_euc_kr(&bytes);
        assert!(text.starts_with('A'));
        assert!(text.ends_with('B'));
        assert!(text.contains('\u{FFFD}'));
    }
}
