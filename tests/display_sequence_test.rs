use std::fs;
use std::path::Path;
use std::sync::Mutex;

use nwm_show_rust::caller_id;
use nwm_show_rust::display::{
    close_current_figure, has_current_figure, set_current_figure, CallerId, FigureSurface,
    SaveOptions, ShowContext, ShowError, ShowValue,
};
use tempfile::tempdir;

// Minimal PNG signature so captured figures look like real image files.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

struct LinePlotFigure;

impl FigureSurface for LinePlotFigure {
    fn save_png(&self, path: &Path, _options: &SaveOptions) -> std::io::Result<()> {
        fs::write(path, PNG_SIGNATURE)
    }
}

// The current-figure slot is process-wide; tests touching it are serialized
// so the slot cannot change under a running assertion.
static FIGURE_LOCK: Mutex<()> = Mutex::new(());

fn artifact_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_sequential_shows_fill_slots_without_gaps() {
    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("sequence_check");

    for expected in ["C_0.txt", "C_1.txt", "C_2.txt"] {
        let path = ctx.show(&caller, "streamflow summary", None).unwrap();
        assert_eq!(path, ctx.caller_dir(&caller).join(expected));
    }

    assert_eq!(
        artifact_names(&ctx.caller_dir(&caller)),
        vec!["C_0.txt", "C_1.txt", "C_2.txt"]
    );
}

#[test]
fn test_text_round_trip_with_and_without_prefix() {
    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("round_trip");

    let bare = ctx.show(&caller, "3", None).unwrap();
    assert_eq!(fs::read_to_string(&bare).unwrap(), "3");

    let prefixed = ctx.show(&caller, "3", Some("Cycle count")).unwrap();
    assert_eq!(fs::read_to_string(&prefixed).unwrap(), "Cycle count\n3");
}

#[test]
fn test_structured_value_round_trips_through_json() {
    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("json_round_trip");
    let original = serde_json::json!({
        "run": "short_range",
        "fcst_cycles": [0, 6],
        "valid": true,
    });

    let path = ctx.show(&caller, original.clone(), None).unwrap();

    assert_eq!(path.extension().unwrap(), "json");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn test_overwrite_replaces_stale_extension() {
    let root = tempdir().unwrap();
    let caller = CallerId::new("overwrite_check");

    // First run of the process leaves a text artifact in slot 0
    let mut previous_run = ShowContext::with_root(root.path());
    previous_run.show(&caller, "first pass", None).unwrap();

    // After a restart the counter begins at 0 again; the slot is re-written
    // with a different serialization family
    let mut ctx = ShowContext::with_root(root.path());
    let path = ctx
        .show(&caller, serde_json::json!({"pass": 2}), None)
        .unwrap();

    assert_eq!(path, ctx.caller_dir(&caller).join("C_0.json"));
    assert_eq!(artifact_names(&ctx.caller_dir(&caller)), vec!["C_0.json"]);
}

#[test]
fn test_clear_display_without_prior_shows_returns_empty() {
    let root = tempdir().unwrap();
    let ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("never_displayed");

    let removed = ctx.clear_display(&caller).unwrap();
    assert!(removed.is_empty());
}

#[test]
fn test_clear_display_removes_artifacts_and_directory() {
    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("cleared_session");

    ctx.show(&caller, "a", None).unwrap();
    ctx.show(&caller, "b", None).unwrap();

    let removed = ctx.clear_display(&caller).unwrap();

    assert_eq!(removed.len(), 2);
    assert!(!ctx.caller_dir(&caller).exists());
}

#[test]
fn test_failed_show_reuses_slot_and_clear_keeps_counters() {
    let _guard = FIGURE_LOCK.lock().unwrap();
    close_current_figure();

    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("retry_session");

    ctx.show(&caller, "first", None).unwrap();

    // The failed figure capture must not burn slot 1
    assert!(ctx.show(&caller, ShowValue::Figure, None).is_err());
    assert_eq!(ctx.sequence(&caller), 1);

    let path = ctx.show(&caller, "second", None).unwrap();
    assert_eq!(path, ctx.caller_dir(&caller).join("C_1.txt"));

    let removed = ctx.clear_display(&caller).unwrap();
    assert_eq!(removed.len(), 2);

    // The counter survives the clear; the next artifact continues at slot 2
    let path = ctx.show(&caller, "third", None).unwrap();
    assert_eq!(path, ctx.caller_dir(&caller).join("C_2.txt"));
}

#[test]
fn test_notebook_session_scenario() {
    let _guard = FIGURE_LOCK.lock().unwrap();
    close_current_figure();

    let root = tempdir().unwrap();
    let mut ctx = ShowContext::with_root(root.path());
    let caller = CallerId::new("channel_rt_session");

    // Capturing the figure sentinel with no active figure fails fast:
    // no directory, no artifact, no counter movement
    let error = ctx.show(&caller, ShowValue::Figure, None).unwrap_err();
    assert!(matches!(error, ShowError::NoActiveFigure));
    assert!(!ctx.caller_dir(&caller).exists());
    assert_eq!(ctx.sequence(&caller), 0);

    // A plain string lands in slot 0 as text
    let path = ctx.show(&caller, "3", None).unwrap();
    assert_eq!(path, ctx.caller_dir(&caller).join("C_0.txt"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "3");

    // A number lands in slot 1 as JSON
    let path = ctx.show(&caller, 3, None).unwrap();
    assert_eq!(path, ctx.caller_dir(&caller).join("C_1.json"));

    // An active line plot lands in slot 2 as an image and is closed
    set_current_figure(Box::new(LinePlotFigure));
    let path = ctx.show(&caller, ShowValue::Figure, None).unwrap();
    assert_eq!(path, ctx.caller_dir(&caller).join("C_2.png"));
    assert_eq!(fs::read(&path).unwrap(), PNG_SIGNATURE);
    assert!(!has_current_figure());

    // Clearing removes all three artifacts and the directory itself
    let removed = ctx.clear_display(&caller).unwrap();
    assert_eq!(removed.len(), 3);
    assert!(!ctx.caller_dir(&caller).exists());
}

#[test]
fn test_default_context_show_and_clear_round_trip() {
    let caller = caller_id!();

    let path = nwm_show_rust::show(&caller, "default context probe", None).unwrap();
    assert!(path.starts_with("dist"));
    assert_eq!(
        path.parent().unwrap().file_name().unwrap(),
        "display_sequence_test"
    );

    let removed = nwm_show_rust::clear_display(&caller).unwrap();
    assert!(removed.contains(&path));

    // Leave the checkout clean when no other caller used the default root
    fs::remove_dir("dist").ok();
}
