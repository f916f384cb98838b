//! P6 (round-trip request_id) and general wire-format determinism, checked
//! against a wide range of generated payloads rather than a handful of
//! examples.

use super::*;
use crate::response::DispatchResult;
use hooks_core::{Decision, EventType};
use proptest::prelude::*;

fn arb_event_type() -> impl Strategy<Value = EventType> {
    prop_oneof![
        Just(EventType::PreToolUse),
        Just(EventType::PostToolUse),
        Just(EventType::SessionStart),
        Just(EventType::SessionEnd),
        Just(EventType::Stop),
        Just(EventType::SubagentStop),
        Just(EventType::PreCompact),
        Just(EventType::UserPromptSubmit),
        Just(EventType::PermissionRequest),
        Just(EventType::Notification),
        Just(EventType::Status),
    ]
}

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Allow), Just(Decision::Deny), Just(Decision::Ask)]
}

proptest! {
    /// Any request that survives `encode`/`decode` comes back byte-identical
    /// in its meaningful fields, and its `request_id` in particular round-
    /// trips exactly — this is what P6 depends on at the wire layer.
    #[test]
    fn request_roundtrips_through_encode_decode(
        event in arb_event_type(),
        request_id in "[a-zA-Z0-9-]{1,32}",
        tool_name in "[a-z]{0,12}",
    ) {
        let request = Request {
            event,
            hook_input: serde_json::json!({"tool_name": tool_name}),
            request_id: request_id.clone(),
        };
        let encoded = encode(&request).expect("encode should not fail");
        let decoded: Request = decode(&encoded).expect("decode should not fail");
        prop_assert_eq!(decoded.request_id, request_id);
        prop_assert_eq!(decoded.event, event);
    }

    /// A success response's `request_id` survives round-trip unchanged,
    /// regardless of decision, reason presence, or how much context was
    /// accumulated.
    #[test]
    fn success_response_roundtrips(
        request_id in "[a-zA-Z0-9-]{1,32}",
        decision in arb_decision(),
        reason in proptest::option::of("[a-zA-Z ]{0,40}"),
        context in proptest::collection::vec("[a-zA-Z0-9 ]{0,20}", 0..5),
        timing_ms in 0u64..100_000,
    ) {
        let response = Response::success(
            request_id.clone(),
            DispatchResult { decision, reason, context: context.clone() },
            timing_ms,
        );
        let encoded = encode(&response).expect("encode should not fail");
        let decoded: Response = decode(&encoded).expect("decode should not fail");
        prop_assert_eq!(decoded.request_id(), Some(request_id.as_str()));
        if let Response::Success { result, timing_ms: decoded_timing, .. } = decoded {
            prop_assert_eq!(result.decision, decision);
            prop_assert_eq!(result.context, context);
            prop_assert_eq!(decoded_timing, timing_ms);
        } else {
            prop_assert!(false, "expected a Success response");
        }
    }

    /// `write_message`'s length prefix always matches the payload it wraps,
    /// for any payload size the max-request-size check would allow through.
    #[test]
    fn write_message_length_prefix_matches_payload_len(len in 0usize..4096) {
        let data = vec![7u8; len];
        let mut buffer = Vec::new();
        let rt = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
        rt.block_on(write_message(&mut buffer, &data)).expect("write should not fail");
        let prefix = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
        prop_assert_eq!(prefix, len);
        prop_assert_eq!(buffer.len(), 4 + len);
    }
}
