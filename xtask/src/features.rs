use anyhow::Result;

use crate::cargo;

/// `leadbridge-common` feature sets that must build on their own.
const FEATURE_COMBINATIONS: &[&[&str]] = &[&[], &["test-utils"]];

/// Check that every feature combination compiles.
pub fn test_feature_matrix() -> Result<()> {
    let total = FEATURE_COMBINATIONS.len();
    println!("Testing {total} leadbridge-common feature combinations...");

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let label = if joined.is_empty() { "default" } else { joined.as_str() };
        println!("\n[{}/{total}] features: {label}", index + 1);

        let mut args = vec!["check", "-p", "leadbridge-common"];
        if !joined.is_empty() {
            args.extend(["--features", joined.as_str()]);
        }
        cargo(&args, &format!("Feature combination '{label}' failed to compile"))?;
    }

    println!("\nAll {total} feature combinations compile");
    Ok(())
}
