// Integration test: formatter output for reply shapes seen in practice

use dashchat_lib::{format_message, render_message, Role};

#[test]
fn blank_inputs_render_nothing() {
    assert_eq!(format_message(None), "");
    assert_eq!(format_message(""), "");
    assert_eq!(format_message("   \n###\n  "), "");
    assert_eq!(format_message("######"), "");
}

#[test]
fn plain_line_becomes_paragraph() {
    assert_eq!(format_message("hello"), "<p>hello</p>");
}

#[test]
fn bold_markers_wrap_in_span() {
    assert_eq!(
        format_message("**hi** there"),
        r#"<p><span class="bold-text">hi</span> there</p>"#
    );
}

#[test]
fn numbered_heading_wins_over_colon() {
    assert_eq!(
        format_message("### 1. Title: detail"),
        r#"<p class="section-title">1. Title: detail</p>"#
    );
}

#[test]
fn dash_line_is_bold_subsection() {
    assert_eq!(
        format_message("### -Point A"),
        r#"<p class="subsection"><span class="bold-text">Point A</span></p>"#
    );
}

#[test]
fn key_value_line_gets_subtitle() {
    assert_eq!(
        format_message("### Name: Alice"),
        r#"<p><span class="subtitle">Name</span>: Alice</p>"#
    );
}

#[test]
fn sections_concatenate_without_separator() {
    assert_eq!(
        format_message("### A: 1\n### B: 2"),
        r#"<p><span class="subtitle">A</span>: 1</p><p><span class="subtitle">B</span>: 2</p>"#
    );
}

#[test]
fn every_bold_span_in_a_line_is_wrapped() {
    assert_eq!(
        format_message("**a** and **b** and **c**"),
        r#"<p><span class="bold-text">a</span> and <span class="bold-text">b</span> and <span class="bold-text">c</span></p>"#
    );
}

#[test]
fn numbered_dash_is_still_a_heading() {
    assert_eq!(format_message("1.-Point"), r#"<p class="section-title">1.-Point</p>"#);
}

#[test]
fn later_colons_stay_in_content() {
    assert_eq!(
        format_message("Time: 10:30"),
        r#"<p><span class="subtitle">Time</span>: 10:30</p>"#
    );
}

#[test]
fn full_reply_mixes_all_shapes() {
    let reply = "Here is the plan.\n### 1. Setup\n- **Install** deps\nTool: cargo\n### Done";
    assert_eq!(
        format_message(reply),
        concat!(
            "<p>Here is the plan.</p>",
            r#"<p class="section-title">1. Setup</p>"#,
            r#"<p class="subsection"><span class="bold-text"><span class="bold-text">Install</span> deps</span></p>"#,
            r#"<p><span class="subtitle">Tool</span>: cargo</p>"#,
            "<p>Done</p>",
        )
    );
}

#[test]
fn non_ascii_text_passes_through() {
    assert_eq!(
        format_message("### 名称: 通义千问"),
        r#"<p><span class="subtitle">名称</span>: 通义千问</p>"#
    );
    assert_eq!(format_message("１. 全角数字"), "<p>１. 全角数字</p>");
}

#[test]
fn user_bubble_keeps_markup_verbatim() {
    let html = render_message(Role::User, "<b>x</b> **not bold**");
    assert!(html.contains("<b>x</b> **not bold**"));
    assert!(html.starts_with(r#"<div class="message user">"#));
}

#[test]
fn bot_bubble_is_formatted() {
    let html = render_message(Role::Bot, "**hi**");
    assert_eq!(
        html,
        r#"<div class="message bot"><img src="/avatar/bot.svg" alt="Bot"><div class="message-content"><p><span class="bold-text">hi</span></p></div></div>"#
    );
}
