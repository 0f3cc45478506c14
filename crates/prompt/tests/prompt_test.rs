//! Unit tests for `prompt`: history formatting and prompt rendering.
//!
//! External interactions: none (pure function tests).

use prompt::{
    format_chat_history, ChatMessage, MessageRole, PromptContext, DEFAULT_HISTORY_TURNS,
    SECTION_CONTEXT, SECTION_HISTORY, SECTION_QUESTION,
};

/// **Test: History lines are "ROLE: content" with the role upper-cased, oldest first.**
#[test]
fn history_formats_upper_case_roles() {
    let turns = [("user", "hi"), ("assistant", "hello!")];
    let out = format_chat_history(turns, DEFAULT_HISTORY_TURNS);
    assert_eq!(out, "USER: hi\nASSISTANT: hello!");
}

/// **Test: Only the last `limit` turns are kept.**
#[test]
fn history_keeps_last_turns() {
    let contents: Vec<String> = (0..10).map(|i| format!("m{}", i)).collect();
    let turns: Vec<(&str, &str)> = contents
        .iter()
        .enumerate()
        .map(|(i, c)| (if i % 2 == 0 { "user" } else { "assistant" }, c.as_str()))
        .collect();
    let out = format_chat_history(turns, 6);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "USER: m4");
    assert_eq!(lines[5], "ASSISTANT: m9");
}

/// **Test: No turns gives an empty history string.**
#[test]
fn history_empty() {
    assert_eq!(format_chat_history(Vec::<(&str, &str)>::new(), 6), "");
}

/// **Test: Rendered prompt names the assistant and carries all three sections in order.**
#[test]
fn render_contains_sections_in_order() {
    let ctx = PromptContext::new("I like tea", "USER: hi", "What do I drink?");
    let out = ctx.render("Spark");
    assert!(out.starts_with("You are Spark, a helpful assistant."));
    assert!(out.contains("provide a fresh joke each time"));

    let c = out.find(SECTION_CONTEXT).unwrap();
    let h = out.find(SECTION_HISTORY).unwrap();
    let q = out.find(SECTION_QUESTION).unwrap();
    assert!(c < h && h < q);
    assert!(out.contains("Context from memory: I like tea"));
    assert!(out.contains("Previous messages: USER: hi"));
    assert!(out.ends_with("Current question: What do I drink?"));
}

/// **Test: Without a system prompt the message list is a single User message.**
#[test]
fn to_messages_without_system() {
    let ctx = PromptContext::new("ctx", "", "q");
    let messages = ctx.to_messages("Spark", None);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, ctx.render("Spark"));
}

/// **Test: A system prompt is placed first.**
#[test]
fn to_messages_with_system() {
    let ctx = PromptContext::new("ctx", "", "q");
    let messages = ctx.to_messages("Spark", Some("Be brief."));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], ChatMessage::system("Be brief."));
    assert_eq!(messages[1].role, MessageRole::User);
}

/// **Test: Role strings match the OpenAI API values.**
#[test]
fn role_as_str() {
    assert_eq!(MessageRole::System.as_str(), "system");
    assert_eq!(MessageRole::User.as_str(), "user");
    assert_eq!(MessageRole::Assistant.as_str(), "assistant");
}
