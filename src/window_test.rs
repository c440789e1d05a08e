use super::*;
use time::macros::datetime;

fn window(cap: Option<usize>) -> ChatWindow {
    ChatWindow::new(cap, TimeStyle::Padded, UtcOffset::UTC)
}

fn message_text(nick: &str, msg: &str) -> String {
    serde_json::json!({
        "time": 1_700_000_000_000_i64,
        "package": { "type": "message", "data": { "nick": nick, "msg": msg } }
    })
    .to_string()
}

const NOW: OffsetDateTime = datetime!(2024-01-02 03:04:05 UTC);

// =============================================================
// ChatLog
// =============================================================

#[test]
fn chat_log_unbounded_keeps_every_line() {
    let mut log = ChatLog::new(None);
    for i in 0..250 {
        assert!(log.push(format!("line {i}")).is_none());
    }
    assert_eq!(log.len(), 250);
    assert_eq!(log.cap(), None);
}

#[test]
fn chat_log_zero_cap_means_unbounded() {
    let log = ChatLog::new(Some(0));
    assert_eq!(log.cap(), None);
}

#[test]
fn chat_log_evicts_oldest_before_appending_past_cap() {
    let mut log = ChatLog::new(Some(100));
    for i in 0..100 {
        assert!(log.push(format!("line {i}")).is_none());
    }
    assert_eq!(log.len(), 100);

    let evicted = log.push("line 100".to_owned());
    assert_eq!(evicted.as_deref(), Some("line 0"));
    assert_eq!(log.len(), 100);
    assert_eq!(log.lines().next(), Some("line 1"));
    assert_eq!(log.lines().last(), Some("line 100"));
}

// =============================================================
// ChatWindow
// =============================================================

#[test]
fn message_line_has_nick_before_text() {
    let mut w = window(None);
    let update = w.apply_text(&message_text("ann", "hello"), NOW).expect("message applies");
    assert_eq!(update, WindowUpdate::Line("[22:13:20] [ann] hello".to_owned()));

    let line = w.log().lines().next().expect("line appended");
    let nick_at = line.find("ann").expect("nick present");
    let msg_at = line.find("hello").expect("message present");
    assert!(nick_at < msg_at);
}

#[test]
fn join_and_leave_render_system_lines() {
    let mut w = window(None);
    let joined = w
        .apply_text(r#"{"time":1700000000000,"package":{"type":"participant-joined","data":"bob"}}"#, NOW)
        .expect("joined applies");
    let left = w
        .apply_text(r#"{"time":1700000000000,"package":{"type":"participant-left","data":"bob"}}"#, NOW)
        .expect("left applies");

    assert_eq!(joined, WindowUpdate::Line("[22:13:20] bob joined the room.".to_owned()));
    assert_eq!(left, WindowUpdate::Line("[22:13:20] bob left the room.".to_owned()));
    assert_eq!(w.log().len(), 2);
}

#[test]
fn participant_update_replaces_list_without_logging() {
    let mut w = window(None);
    w.apply_text(r#"{"time":1,"package":{"type":"participant-update","data":["a","b","c"]}}"#, NOW)
        .expect("first update applies");
    let update = w
        .apply_text(r#"{"time":1,"package":{"type":"participant-update","data":["c"]}}"#, NOW)
        .expect("second update applies");

    assert_eq!(update, WindowUpdate::Participants(vec!["c".to_owned()]));
    assert_eq!(w.participants(), ["c".to_owned()]);
    assert!(w.log().is_empty());
}

#[test]
fn unknown_type_leaves_window_untouched() {
    let mut w = window(None);
    w.apply_text(r#"{"time":1,"package":{"type":"participant-update","data":["a"]}}"#, NOW)
        .expect("update applies");

    let update = w.apply_text(r#"{"time":1,"package":{"type":"kick","data":"a"}}"#, NOW);
    assert!(update.is_none());
    assert!(w.log().is_empty());
    assert_eq!(w.participants(), ["a".to_owned()]);
}

#[test]
fn malformed_frame_leaves_window_untouched() {
    let mut w = window(None);
    assert!(w.apply_text("{", NOW).is_none());
    assert!(w.apply_text("", NOW).is_none());
    assert!(w.log().is_empty());
}

#[test]
fn capped_window_never_exceeds_cap() {
    let mut w = window(Some(100));
    for i in 0..101 {
        w.apply_text(&message_text("ann", &format!("msg {i}")), NOW)
            .expect("message applies");
    }
    assert_eq!(w.log().len(), 100);
    assert!(w.log().lines().next().expect("first line").ends_with("msg 1"));
    assert!(w.log().lines().last().expect("last line").ends_with("msg 100"));
}

#[test]
fn missing_time_falls_back_to_receive_time() {
    let mut w = window(None);
    let update = w
        .apply_text(r#"{"package":{"type":"participant-joined","data":"bob"}}"#, NOW)
        .expect("joined applies");
    assert_eq!(update, WindowUpdate::Line("[03:04:05] bob joined the room.".to_owned()));
}

#[test]
fn window_renders_clock_in_configured_offset() {
    let offset = UtcOffset::from_hms(2, 0, 0).expect("valid offset");
    let mut w = ChatWindow::new(None, TimeStyle::Padded, offset);
    let update = w.apply_text(&message_text("ann", "hi"), NOW).expect("message applies");
    assert_eq!(update, WindowUpdate::Line("[00:13:20] [ann] hi".to_owned()));
}

#[test]
fn format_clock_pads_or_keeps_bare_fields() {
    let at = datetime!(2024-01-02 09:05:03 UTC);
    assert_eq!(format_clock(at, TimeStyle::Padded), "09:05:03");
    assert_eq!(format_clock(at, TimeStyle::Bare), "9:5:3");
}

#[test]
fn odd_typed_time_falls_back_to_receive_time() {
    let mut w = window(None);
    let joined = w
        .apply_text(r#"{"time":true,"package":{"type":"participant-joined","data":"bob"}}"#, NOW)
        .expect("joined applies despite bool time");
    let message = w
        .apply_text(r#"{"time":{},"package":{"type":"message","data":{"nick":"bob","msg":"hi"}}}"#, NOW)
        .expect("message applies despite object time");

    assert_eq!(joined, WindowUpdate::Line("[03:04:05] bob joined the room.".to_owned()));
    assert_eq!(message, WindowUpdate::Line("[03:04:05] [bob] hi".to_owned()));
    assert_eq!(w.log().len(), 2);
}
