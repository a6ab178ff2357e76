use super::*;

// ===== request building =====

#[test]
fn cc_messages_prepend_system_when_present() {
    let messages = vec![Message::user("Hi")];
    let out = build_chat_completions_messages("You are a helpful assistant.", &messages);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].role, "system");
    assert_eq!(out[0].content, "You are a helpful assistant.");
    assert_eq!(out[1].role, "user");
    assert_eq!(out[1].content, "Hi");
}

#[test]
fn cc_messages_skip_blank_system() {
    let messages = vec![Message::user("Hi")];
    let out = build_chat_completions_messages("  ", &messages);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].role, "user");
}

#[test]
fn resp_request_omits_empty_instructions() {
    let messages = vec![Message::user("")];
    let input = build_responses_input(&messages);
    let body = RespRequest { model: "gpt-4o", max_output_tokens: 16, instructions: None, input: &input };
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("instructions").is_none());
    assert_eq!(
        json["input"],
        serde_json::json!([{ "type": "message", "role": "user", "content": [{ "type": "input_text", "text": "" }] }])
    );
}

// ===== chat completions =====

#[test]
fn cc_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Hello!" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.text(), "Hello!");
    assert_eq!(resp.stop_reason, "end_turn");
    assert_eq!(resp.input_tokens, 10);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn cc_parse_length_finish_reason() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "choices": [{ "message": { "content": "cut" }, "finish_reason": "length" }]
    })
    .to_string();
    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
}

#[test]
fn cc_parse_missing_choices() {
    let json = serde_json::json!({ "model": "gpt-4o", "choices": [] }).to_string();
    assert!(matches!(parse_chat_completions_response(&json), Err(LlmError::ApiParse(_))));
}

// ===== responses API =====

#[test]
fn resp_parse_text_response() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [{
            "type": "message",
            "content": [{ "type": "output_text", "text": "Done!" }]
        }],
        "usage": { "input_tokens": 15, "output_tokens": 8 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.content.len(), 1);
    assert_eq!(resp.text(), "Done!");
    assert_eq!(resp.stop_reason, "end_turn");
}

#[test]
fn resp_parse_skips_reasoning_items() {
    let json = serde_json::json!({
        "model": "o4-mini",
        "output": [
            { "type": "reasoning", "summary": [] },
            { "type": "message", "content": [{ "type": "output_text", "text": "Arr" }] }
        ]
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.text(), "Arr");
}

#[test]
fn resp_parse_output_text_fallback() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output_text": "Fallback text",
        "usage": { "input_tokens": 5, "output_tokens": 3 }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.text(), "Fallback text");
}

#[test]
fn resp_parse_incomplete_max_tokens() {
    let json = serde_json::json!({
        "model": "gpt-4o",
        "output": [],
        "incomplete_details": { "reason": "max_output_tokens" }
    })
    .to_string();
    let resp = parse_responses_response(&json).unwrap();
    assert_eq!(resp.stop_reason, "max_tokens");
    assert!(resp.content.is_empty());
}

#[test]
fn resp_parse_invalid_json() {
    assert!(matches!(parse_responses_response("<html>"), Err(LlmError::ApiParse(_))));
}
