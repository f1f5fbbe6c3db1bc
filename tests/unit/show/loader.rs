use super::*;

fn verbs(cmds: &[Command]) -> Vec<&str> {
    cmds.iter().map(Command::verb).collect()
}

#[test]
fn directives_drop_the_marker() {
    let cmds = parse_show(": dimensions 640 480\n: newslide\n");
    assert_eq!(verbs(&cmds), ["dimensions", "newslide"]);
    assert_eq!(cmds[0].args(), ["640", "480"]);
    assert_eq!(cmds[0].line(), 1);
    assert_eq!(cmds[1].line(), 2);
}

#[test]
fn bare_text_becomes_printline_with_whole_line() {
    let cmds = parse_show("   Hello   big  world  \n");
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].verb(), PRINTLINE_VERB);
    assert_eq!(cmds[0].args(), ["Hello   big  world"]);
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let text = "// a comment\n# another\n\n   \n: newslide\n#not-a-marker stays text\n";
    let cmds = parse_show(text);
    assert_eq!(verbs(&cmds), ["newslide", "printline"]);
    assert_eq!(cmds[1].args(), ["#not-a-marker stays text"]);
}

#[test]
fn lone_marker_is_dropped() {
    let cmds = parse_show(":\n: blank\n");
    assert_eq!(verbs(&cmds), ["blank"]);
}

#[test]
fn expect_args_reports_count_mismatch() {
    let cmds = parse_show(": fontset\n");
    let err = cmds[0].expect_args::<1>().unwrap_err();
    assert!(err.to_string().contains("'fontset' takes 1 argument(s), got 0"));
}

#[test]
fn load_show_missing_file_is_a_load_error() {
    let err = load_show(Path::new("definitely/not/here/show.cfg")).unwrap_err();
    assert!(matches!(err, SlideError::Load(_)));
}
