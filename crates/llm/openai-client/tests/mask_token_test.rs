//! Unit tests for `mask_token`.
//!
//! API keys are logged as first 7 + "***" + last 4 chars; keys of 11 chars or fewer
//! become "***".

use openai_client::mask_token;

/// **Test: Short keys are fully masked.**
#[test]
fn mask_token_short_returns_all_star() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("a"), "***");
    assert_eq!(mask_token("sk-12345"), "***");
    assert_eq!(mask_token("sk-proj-12"), "***");
}

/// **Test: Long keys show head and tail only.**
#[test]
fn mask_token_long_shows_head_and_tail() {
    // Length > 11: show first 7 + "***" + last 4
    assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    // len 12: head 7 = "sk-proj", tail 4 = last 4 = "xyzw"
    assert_eq!(mask_token("sk-proj-xyzw"), "sk-proj***xyzw");
}

/// **Test: A realistic key keeps its 7-char prefix and 4-char suffix.**
#[test]
fn mask_token_typical_openai_key() {
    // Typical OpenAI key is long; we expect first 7 and last 4 visible
    let key = "sk-proj-1234567890abcdefghijklmnopqrstuvwxyz";
    let masked = mask_token(key);
    assert!(masked.starts_with("sk-proj"));
    assert!(masked.ends_with("wxyz"));
    assert!(masked.contains("***"));
    assert_eq!(masked.len(), 7 + 3 + 4);
}

/// **Test: Multi-byte characters are counted as chars, never split.**
#[test]
fn mask_token_non_ascii() {
    let key = "ключ-секретный-ключ";
    let masked = mask_token(key);
    assert_eq!(masked, "ключ-се***ключ");
}
