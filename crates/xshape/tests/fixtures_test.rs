use std::fs;

use xshape::parse;

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let fixtures_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    for entry in fs::read_dir(fixtures_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)?;
        if parse(&content).is_err() {
            return Err(
                std::io::Error::other(format!("failed to parse valid fixture: {path:?}")).into(),
            );
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let entry = entry?;
        let path = entry.path();
        let content = fs::read_to_string(&path)?;
        if parse(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "should fail to parse invalid fixture: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}
