//! Startup with an output that cannot be opened.

use bookstore_observability::LoggerError;

#[test]
fn unwritable_output_aborts_initialization() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing").join("service.log");

    // SAFETY: this is the only test in this binary, and it runs before any
    // other thread reads the environment.
    unsafe {
        std::env::set_var("LOG_OUTPUT", &path);
    }

    match bookstore_observability::init() {
        Err(LoggerError::OpenOutput { path: reported, .. }) => {
            assert_eq!(reported, path);
        }
        other => panic!("expected OpenOutput, got {other:?}"),
    }

    let lazy = std::panic::catch_unwind(|| {
        bookstore_observability::info!("never written");
    });
    let payload = lazy.expect_err("lazy initialization must panic");
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert!(message.contains("logger initialization failed"), "{message}");
    assert!(!path.exists());

    Ok(())
}
