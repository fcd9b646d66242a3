//! HTML generation for conversation screens
//!
//! The document is assembled from four stacked sections: status bar, chat
//! header, message area, and input bar. All colors come from the palette in
//! the render context and all fixed distances from the variant metrics, so
//! the same assembly serves both platform styles.

use crate::model::{Contact, Conversation, Message, Sender};

use super::{group_positions, GroupPosition, RenderContext, RenderedDocument};

/// Tiled doodle pattern behind the chat area, as embedded PNG data
const CHAT_PATTERN: &str = "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAYAAACNMs+9AAAAQElEQVQYV2NkIBIwEqmOgXCF/4nRQ7RCYjQTrZAYzUQrJEYz0QqJ0Uy0QmI0E62QGM1EKyRGM9EKidGMt0IAHQ4FIBLlYFoAAAAASUVORK5CYII=";

/// Build HTML body markup incrementally
struct HtmlBuilder {
    lines: Vec<String>,
    indent: usize,
}

impl HtmlBuilder {
    fn new() -> Self {
        Self {
            lines: vec![],
            indent: 1,
        }
    }

    fn indent_str(&self) -> String {
        "  ".repeat(self.indent)
    }

    /// Open a container element; `attrs` must start with a space when present
    fn open_tag(&mut self, tag: &str, attrs: &str) {
        self.lines
            .push(format!("{}<{}{}>", self.indent_str(), tag, attrs));
        self.indent += 1;
    }

    fn close_tag(&mut self, tag: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.lines.push(format!("{}</{}>", self.indent_str(), tag));
    }

    /// Add one self-contained markup line
    fn add_line(&mut self, markup: &str) {
        self.lines.push(format!("{}{}", self.indent_str(), markup));
    }

    /// Wrap the collected body in a full standalone document
    fn build(self, css: &str) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html>\n");
        html.push_str("<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str("<style>\n");
        html.push_str(css);
        html.push_str("</style>\n");
        html.push_str("</head>\n");
        html.push_str("<body>\n");
        for line in &self.lines {
            html.push_str(line);
            html.push('\n');
        }
        html.push_str("</body>\n");
        html.push_str("</html>\n");
        html
    }
}

/// Render a conversation into a standalone HTML document
pub fn render_document(conversation: &Conversation, ctx: &RenderContext) -> RenderedDocument {
    let mut builder = HtmlBuilder::new();

    builder.open_tag("div", r#" class="screen""#);
    push_status_bar(&mut builder, ctx);
    push_header(&mut builder, &conversation.contact);
    push_chat_area(&mut builder, &conversation.messages, ctx);
    push_input_bar(&mut builder);
    builder.close_tag("div");

    let html = builder.build(&stylesheet(ctx));
    RenderedDocument::new(html, ctx.width, ctx.metrics.device_scale)
}

fn push_status_bar(builder: &mut HtmlBuilder, ctx: &RenderContext) {
    builder.open_tag("div", r#" class="status-bar""#);
    builder.add_line(&format!(
        r#"<span class="clock">{}</span>"#,
        ctx.metrics.clock
    ));
    builder.open_tag("span", r#" class="icons""#);
    builder.add_line("<span>\u{1F4F6}</span>");
    builder.add_line("<span>\u{1F4E1}</span>");
    builder.add_line("<span>\u{1F50B}</span>");
    builder.close_tag("span");
    builder.close_tag("div");
}

fn push_header(builder: &mut HtmlBuilder, contact: &Contact) {
    builder.open_tag("div", r#" class="header""#);
    builder.add_line("<span class=\"back\">\u{2039}</span>");

    match &contact.avatar {
        Some(url) => {
            builder.open_tag("div", r#" class="avatar""#);
            builder.add_line(&format!(r#"<img src="{}" alt="">"#, escape_html(url)));
            builder.close_tag("div");
        }
        None => builder.add_line(&format!(
            r#"<div class="avatar">{}</div>"#,
            escape_html(&initials(&contact.name))
        )),
    }

    builder.open_tag("div", r#" class="contact-info""#);
    builder.add_line(&format!(
        r#"<div class="contact-name">{}</div>"#,
        escape_html(&contact.name)
    ));
    builder.add_line(&format!(
        r#"<div class="contact-status">{}</div>"#,
        escape_html(contact.display_status())
    ));
    builder.close_tag("div");

    builder.open_tag("div", r#" class="actions""#);
    builder.add_line("<span>\u{1F4F9}</span>");
    builder.add_line("<span>\u{1F4DE}</span>");
    builder.add_line("<span>\u{22EE}</span>");
    builder.close_tag("div");

    builder.close_tag("div");
}

fn push_chat_area(builder: &mut HtmlBuilder, messages: &[Message], ctx: &RenderContext) {
    builder.open_tag("div", r#" class="chat-area""#);
    let positions = group_positions(messages);
    for (message, position) in messages.iter().zip(positions) {
        push_message(builder, message, position, ctx);
    }
    builder.close_tag("div");
}

fn push_message(
    builder: &mut HtmlBuilder,
    message: &Message,
    position: GroupPosition,
    ctx: &RenderContext,
) {
    let side = match message.from {
        Sender::Me => "sent",
        Sender::Contact => "received",
    };

    let mut row_classes = format!(
        "message-row {} {}",
        side,
        if position.first {
            "group-start"
        } else {
            "continuation"
        }
    );
    if position.last {
        row_classes.push_str(" group-end");
    }

    let mut bubble_classes = format!("bubble {}", side);
    if position.first {
        if ctx.metrics.bubble_tail {
            bubble_classes.push_str(match message.from {
                Sender::Me => " tail-out",
                Sender::Contact => " tail-in",
            });
        } else {
            bubble_classes.push_str(" group-start");
        }
    }

    builder.open_tag("div", &format!(r#" class="{row_classes}""#));
    builder.open_tag("div", &format!(r#" class="{bubble_classes}""#));
    builder.add_line(&format!(
        r#"<span class="text">{}</span>"#,
        escape_html(&message.text)
    ));
    builder.open_tag("span", r#" class="meta""#);
    builder.add_line(&format!(
        r#"<span class="time">{}</span>"#,
        escape_html(message.time.as_deref().unwrap_or(""))
    ));
    if message.from == Sender::Me {
        builder.add_line("<span class=\"ticks\">\u{2713}\u{2713}</span>");
    }
    builder.close_tag("span");
    builder.close_tag("div");
    builder.close_tag("div");
}

fn push_input_bar(builder: &mut HtmlBuilder) {
    builder.open_tag("div", r#" class="input-bar""#);
    builder.add_line("<span class=\"icon\">\u{1F60A}</span>");
    builder.add_line(r#"<div class="input-box">Message</div>"#);
    builder.add_line("<span class=\"icon\">\u{1F4CE}</span>");
    builder.add_line("<span class=\"icon\">\u{1F4F7}</span>");
    builder.add_line("<div class=\"mic\">\u{1F3A4}</div>");
    builder.close_tag("div");
}

/// The document stylesheet with palette colors and variant metrics applied
fn stylesheet(ctx: &RenderContext) -> String {
    let palette = ctx.palette;
    let metrics = ctx.metrics;

    let chat_background = if ctx.dark {
        let tint = hex_rgba(palette.background, 0.95);
        format!("linear-gradient({tint}, {tint}), url(\"data:image/png;base64,{CHAT_PATTERN}\")")
    } else {
        format!("url(\"data:image/png;base64,{CHAT_PATTERN}\")")
    };

    let mut css = format!(
        r#"* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
  font-size: 14.5px;
  line-height: 1.35;
  width: {width}px;
  min-height: 100vh;
  background: {background};
}}
.screen {{ width: 100%; min-height: 100vh; display: flex; flex-direction: column; }}
.status-bar {{
  height: {status_bar}px;
  background: {header};
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0 16px;
  color: #ffffff;
  font-size: 14px;
}}
.status-bar .clock {{ font-weight: 600; }}
.status-bar .icons {{ display: flex; gap: 4px; }}
.header {{
  height: {header_height}px;
  background: {header};
  display: flex;
  align-items: center;
  padding: 0 8px;
  color: #ffffff;
}}
.header .back {{ font-size: 24px; margin-right: 4px; }}
.header .avatar {{
  width: 40px;
  height: 40px;
  border-radius: 50%;
  background: {avatar};
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 18px;
  font-weight: 500;
  margin-right: 12px;
  overflow: hidden;
}}
.header .avatar img {{ width: 100%; height: 100%; object-fit: cover; }}
.header .contact-info {{ flex: 1; }}
.header .contact-name {{ font-size: 16px; font-weight: 500; }}
.header .contact-status {{ font-size: 12px; opacity: 0.85; }}
.header .actions {{ display: flex; gap: 20px; font-size: 20px; }}
.chat-area {{
  flex: 1;
  min-height: calc(100vh - {chrome_height}px);
  padding: 8px 12px;
  background: {chat_background};
  background-color: {background};
}}
.message-row {{ display: flex; margin-bottom: 1px; }}
.message-row.sent {{ justify-content: flex-end; }}
.message-row.received {{ justify-content: flex-start; }}
.message-row.group-start {{ margin-top: {group_start}px; }}
.message-row.continuation {{ margin-top: {continuation}px; }}
.message-row.group-end {{ margin-bottom: {group_end}px; }}
.bubble {{
  max-width: {bubble_max}%;
  padding: 6px 8px 6px 9px;
  border-radius: {radius}px;
  position: relative;
  box-shadow: 0 1px 0.5px rgba(0, 0, 0, 0.13);
}}
.bubble.sent {{ background: {sent}; }}
.bubble.received {{ background: {received}; }}
.bubble .text {{ color: {text}; white-space: pre-wrap; word-wrap: break-word; }}
.bubble .meta {{ float: right; margin: 4px 0 -4px 8px; display: flex; align-items: center; }}
.bubble .time {{ font-size: 11px; color: {timestamp}; }}
.bubble .ticks {{ font-size: 14px; color: {tick}; margin-left: 2px; }}
.input-bar {{
  height: {input_bar}px;
  background: {input_bar_bg};
  display: flex;
  align-items: center;
  padding: 8px;
  gap: 8px;
}}
.input-bar .icon {{ font-size: 24px; color: {icon}; }}
.input-bar .input-box {{
  flex: 1;
  height: 40px;
  background: {input_box};
  border-radius: 20px;
  display: flex;
  align-items: center;
  padding: 0 12px;
  color: {timestamp};
  font-size: 15px;
}}
.input-bar .mic {{
  width: 40px;
  height: 40px;
  background: {accent};
  border-radius: 50%;
  display: flex;
  align-items: center;
  justify-content: center;
  font-size: 20px;
}}
"#,
        width = ctx.width,
        background = palette.background,
        header = palette.header,
        avatar = palette.avatar,
        chat_background = chat_background,
        chrome_height = metrics.status_bar_height + metrics.header_height + metrics.input_bar_height,
        status_bar = metrics.status_bar_height,
        header_height = metrics.header_height,
        group_start = metrics.group_start_margin,
        continuation = metrics.continuation_margin,
        group_end = metrics.group_end_margin,
        bubble_max = metrics.bubble_max_width,
        radius = metrics.bubble_radius,
        sent = palette.sent_bubble,
        received = palette.received_bubble,
        text = palette.text,
        timestamp = palette.timestamp,
        tick = palette.tick,
        input_bar = metrics.input_bar_height,
        input_bar_bg = palette.input_bar,
        icon = palette.icon,
        input_box = palette.input_box,
        accent = palette.accent,
    );

    if metrics.bubble_tail {
        css.push_str(&format!(
            r#".bubble.tail-out::before {{
  content: "";
  position: absolute;
  top: 0;
  right: -8px;
  width: 0;
  height: 0;
  border-top: 8px solid {sent};
  border-right: 8px solid transparent;
}}
.bubble.tail-in::before {{
  content: "";
  position: absolute;
  top: 0;
  left: -8px;
  width: 0;
  height: 0;
  border-top: 8px solid {received};
  border-left: 8px solid transparent;
}}
"#,
            sent = palette.sent_bubble,
            received = palette.received_bubble,
        ));
    } else {
        // iOS squares off the top corner on the sender's side instead
        css.push_str(
            ".bubble.sent.group-start { border-top-right-radius: 0; }\n\
             .bubble.received.group-start { border-top-left-radius: 0; }\n",
        );
    }

    css
}

/// Escape markup-reserved characters and turn newlines into line breaks
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '\n' => out.push_str("<br>"),
            other => out.push(other),
        }
    }
    out
}

/// Derive avatar initials from a display name.
///
/// Takes the first character of up to the first two whitespace-separated
/// words, uppercased. An empty name yields an empty string.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// `#rrggbb` to `rgba(r, g, b, a)`, for the dark-mode pattern tint
fn hex_rgba(hex: &str, alpha: f64) -> String {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return format!("rgba(0, 0, 0, {alpha})");
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
    format!(
        "rgba({}, {}, {}, {})",
        channel(0),
        channel(2),
        channel(4),
        alpha
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleVariant;
    use pretty_assertions::assert_eq;

    fn message(from: Sender, text: &str) -> Message {
        Message {
            from,
            text: text.to_string(),
            time: None,
        }
    }

    fn conversation(messages: Vec<Message>) -> Conversation {
        Conversation {
            platform: StyleVariant::Ios,
            contact: Contact::default(),
            messages,
        }
    }

    fn render(conversation: &Conversation, variant: StyleVariant, dark: bool) -> String {
        let ctx = RenderContext::new(variant, dark, 390);
        render_document(conversation, &ctx).html().to_string()
    }

    #[test]
    fn test_escape_html_covers_reserved_characters() {
        assert_eq!(
            escape_html(r#"<b>&"quoted"&'x'</b>"#),
            "&lt;b&gt;&amp;&quot;quoted&quot;&amp;&#039;x&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_html_turns_newlines_into_breaks() {
        assert_eq!(escape_html("line one\nline two"), "line one<br>line two");
    }

    #[test]
    fn test_initials_take_first_two_words() {
        assert_eq!(initials("María García"), "MG");
        assert_eq!(initials("María García López"), "MG");
        assert_eq!(initials("ana"), "A");
        assert_eq!(initials(""), "");
        assert_eq!(initials("   "), "");
    }

    #[test]
    fn test_hex_rgba_conversion() {
        assert_eq!(hex_rgba("#0b141a", 0.95), "rgba(11, 20, 26, 0.95)");
        assert_eq!(hex_rgba("#ffffff", 0.5), "rgba(255, 255, 255, 0.5)");
        assert_eq!(hex_rgba("nonsense", 1.0), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn test_document_is_standalone_html() {
        let convo = conversation(vec![message(Sender::Me, "hola")]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));
        assert!(html.contains("<meta charset=\"UTF-8\">"));
        assert!(html.contains("hola"));
    }

    #[test]
    fn test_message_text_is_escaped() {
        let convo = conversation(vec![message(Sender::Contact, "<script>alert('x')</script>")]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_sent_and_received_sides() {
        let convo = conversation(vec![
            message(Sender::Me, "mine"),
            message(Sender::Contact, "theirs"),
        ]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains(r#"class="message-row sent group-start group-end""#));
        assert!(html.contains(r#"class="message-row received group-start group-end""#));
    }

    #[test]
    fn test_only_sent_messages_carry_ticks() {
        let convo = conversation(vec![message(Sender::Contact, "theirs")]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(!html.contains("ticks"));

        let convo = conversation(vec![message(Sender::Me, "mine")]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains("ticks"));
    }

    #[test]
    fn test_consecutive_messages_become_continuations() {
        let convo = conversation(vec![
            message(Sender::Me, "first"),
            message(Sender::Me, "second"),
            message(Sender::Contact, "reply"),
        ]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert_eq!(
            html.matches(r#"class="message-row sent group-start""#).count(),
            1
        );
        assert_eq!(
            html.matches(r#"class="message-row sent continuation group-end""#)
                .count(),
            1
        );
        assert_eq!(
            html.matches(r#"class="message-row received group-start group-end""#)
                .count(),
            1
        );
    }

    #[test]
    fn test_android_gets_tails_and_ios_gets_square_corners() {
        let convo = conversation(vec![
            message(Sender::Me, "a"),
            message(Sender::Contact, "b"),
        ]);

        let android = render(&convo, StyleVariant::Android, false);
        assert!(android.contains("tail-out"));
        assert!(android.contains("tail-in"));
        assert!(!android.contains("border-top-right-radius: 0"));

        let ios = render(&convo, StyleVariant::Ios, false);
        assert!(!ios.contains("tail-out"));
        assert!(ios.contains("border-top-right-radius: 0"));
    }

    #[test]
    fn test_android_tail_only_on_the_first_of_a_group() {
        let convo = conversation(vec![
            message(Sender::Me, "first"),
            message(Sender::Me, "second"),
        ]);
        let html = render(&convo, StyleVariant::Android, false);
        assert_eq!(html.matches(r#"class="bubble sent tail-out""#).count(), 1);
        assert_eq!(html.matches(r#"class="bubble sent""#).count(), 1);
    }

    #[test]
    fn test_dark_mode_uses_dark_palette() {
        let convo = conversation(vec![message(Sender::Me, "hola")]);
        let light = render(&convo, StyleVariant::Ios, false);
        let dark = render(&convo, StyleVariant::Ios, true);
        assert!(light.contains("#efeae2"));
        assert!(!light.contains("linear-gradient"));
        assert!(dark.contains("#0b141a"));
        assert!(dark.contains("linear-gradient(rgba(11, 20, 26, 0.95)"));
    }

    #[test]
    fn test_header_shows_initials_without_avatar() {
        let convo = Conversation {
            platform: StyleVariant::Ios,
            contact: Contact {
                name: "María García".to_string(),
                ..Contact::default()
            },
            messages: vec![],
        };
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains(r#"<div class="avatar">MG</div>"#));
        assert!(html.contains("María García"));
    }

    #[test]
    fn test_header_embeds_avatar_url() {
        let convo = Conversation {
            platform: StyleVariant::Ios,
            contact: Contact {
                avatar: Some("data:image/png;base64,AAAA".to_string()),
                ..Contact::default()
            },
            messages: vec![],
        };
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA" alt="">"#));
        assert!(!html.contains(">C</div>"));
    }

    #[test]
    fn test_timestamps_render_inside_meta() {
        let convo = conversation(vec![Message {
            from: Sender::Contact,
            text: "hola".to_string(),
            time: Some("10:31".to_string()),
        }]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains(r#"<span class="time">10:31</span>"#));
    }

    #[test]
    fn test_empty_conversation_still_renders_chrome() {
        let convo = conversation(vec![]);
        let html = render(&convo, StyleVariant::Ios, false);
        assert!(html.contains("status-bar"));
        assert!(html.contains("chat-area"));
        assert!(html.contains("input-bar"));
        assert!(!html.contains("message-row"));
    }

    #[test]
    fn test_width_lands_in_stylesheet() {
        let convo = conversation(vec![]);
        let ctx = RenderContext::new(StyleVariant::Ios, false, 420);
        let doc = render_document(&convo, &ctx);
        assert!(doc.html().contains("width: 420px;"));
        assert_eq!(doc.width(), 420);
    }

    #[test]
    fn test_device_scale_follows_variant() {
        let convo = conversation(vec![]);
        let ios = render_document(&convo, &RenderContext::new(StyleVariant::Ios, false, 390));
        let android =
            render_document(&convo, &RenderContext::new(StyleVariant::Android, false, 390));
        assert_eq!(ios.scale(), 2.0);
        assert_eq!(android.scale(), 3.0);
    }
}
