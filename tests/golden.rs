//! Golden tests for the guest session kernel.
//!
//! These tests pin the observable token format and the end-to-end
//! mint/validate behavior the hosting application relies on.

use guest_session_kernel::{
    create_guest_session_token, validate_guest_session_token, GuestClaims, GuestId,
    SignedGuestToken, TokenHeader,
};

/// Test HMAC secret for integration tests
const TEST_SECRET: &str = "secret32charsminimum_for_testing";

// ─────────────────────────────────────────────────────────────────────────────
// TOKEN FORMAT
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_token_is_three_dot_separated_segments() {
    let token = create_guest_session_token(&GuestId::new("abc-123"), TEST_SECRET, None).unwrap();

    assert_eq!(token.as_str().matches('.').count(), 2);
    let segments: Vec<&str> = token.as_str().split('.').collect();
    assert_eq!(segments.len(), 3);
    assert!(segments.iter().all(|s| !s.is_empty()));
}

#[test]
fn test_header_segment_decodes_to_hs256() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, None).unwrap();
    let header_segment = token.as_str().split('.').next().unwrap();

    let header: TokenHeader =
        guest_session_kernel::encoding::decode_segment(header_segment).unwrap();
    assert_eq!(header, TokenHeader::hs256());
}

#[test]
fn test_payload_segment_carries_guest_id_and_window() {
    let token = create_guest_session_token(&GuestId::new("abc-123"), TEST_SECRET, None).unwrap();
    let payload_segment = token.as_str().split('.').nth(1).unwrap();

    let claims: GuestClaims =
        guest_session_kernel::encoding::decode_segment(payload_segment).unwrap();
    assert_eq!(claims.guest_id, GuestId::new("abc-123"));
    assert_eq!(claims.sub, "guest");
    assert_eq!(claims.role, "guest");
    assert!(claims.exp > claims.iat);
    assert_eq!(claims.nbf, claims.iat);
}

#[test]
fn test_token_is_cookie_safe() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, None).unwrap();
    assert!(token
        .as_str()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'));
}

// ─────────────────────────────────────────────────────────────────────────────
// MINT / VALIDATE SCENARIOS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_concrete_mint_and_validate_scenario() {
    // create("abc-123", "secret32charsminimum...") yields a string with
    // exactly two '.' separators; validating that exact string with the
    // same secret returns "abc-123".
    let token = create_guest_session_token(&GuestId::new("abc-123"), TEST_SECRET, None).unwrap();
    assert_eq!(token.as_str().matches('.').count(), 2);

    let validated = validate_guest_session_token(token.as_str(), TEST_SECRET);
    assert_eq!(validated, Some(GuestId::new("abc-123")));
}

#[test]
fn test_hand_assembled_forgery_returns_none() {
    // header.base64(payload-with-victim-guestId).fake-signature validated
    // against the real secret must return None.
    let header = guest_session_kernel::encoding::encode_segment(&TokenHeader::hs256());
    let payload = guest_session_kernel::encoding::encode_segment(&GuestClaims::new(
        GuestId::new("victim-guest-id"),
        7,
    ));
    let forged = format!("{header}.{payload}.fake-signature");

    assert_eq!(validate_guest_session_token(&forged, TEST_SECRET), None);
}

#[test]
fn test_cross_secret_validation_returns_none() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, None).unwrap();
    assert_eq!(
        validate_guest_session_token(token.as_str(), "a_completely_different_secret_!!"),
        None
    );
}

#[test]
fn test_already_expired_token_returns_none() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, Some(-3)).unwrap();
    assert_eq!(validate_guest_session_token(token.as_str(), TEST_SECRET), None);
}

#[test]
fn test_every_trailing_character_mutation_invalidates() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, None).unwrap();
    let text = token.as_str();

    // Mutate the final character through several replacements
    for replacement in ['A', 'B', '0', '9', '_'] {
        let mut mutated: Vec<char> = text.chars().collect();
        let last = mutated.len() - 1;
        if mutated[last] == replacement {
            continue;
        }
        mutated[last] = replacement;
        let mutated: String = mutated.into_iter().collect();

        assert_eq!(validate_guest_session_token(&mutated, TEST_SECRET), None);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IDENTITY SEMANTICS
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_same_guest_across_two_valid_tokens() {
    let guest_id = GuestId::random();
    let t1 = create_guest_session_token(&guest_id, TEST_SECRET, None).unwrap();
    let t2 = create_guest_session_token(&guest_id, TEST_SECRET, Some(30)).unwrap();

    let g1 = validate_guest_session_token(t1.as_str(), TEST_SECRET).unwrap();
    let g2 = validate_guest_session_token(t2.as_str(), TEST_SECRET).unwrap();
    assert_eq!(g1, g2);
}

#[test]
fn test_validation_has_no_side_effects() {
    let token = create_guest_session_token(&GuestId::new("replayable"), TEST_SECRET, None).unwrap();

    // Tokens are reusable until expiry: no replay counter, no single-use
    // invalidation
    let results: Vec<_> = (0..50)
        .map(|_| validate_guest_session_token(token.as_str(), TEST_SECRET))
        .collect();
    assert!(results
        .iter()
        .all(|r| r.as_ref().map(GuestId::as_str) == Some("replayable")));
}

#[test]
fn test_presented_token_string_roundtrips_through_newtype() {
    let token = create_guest_session_token(&GuestId::random(), TEST_SECRET, None).unwrap();
    let reparsed = SignedGuestToken::from_string(token.as_str().to_string());
    assert_eq!(reparsed, token);
    assert!(reparsed.is_valid_format());
}
