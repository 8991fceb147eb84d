//! `resolve` and `catalog` command handlers. None of these need a database.

use std::path::Path;

use orderlink_core::{Catalog, Resolution};

/// Print the catalog code for a listing and day count, with the rule that
/// decided it.
pub(crate) fn run_resolve(
    catalog_path: Option<&Path>,
    listing: &str,
    days: i64,
) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_embedded(catalog_path)?;
    println!("{}", describe_resolution(&catalog.resolution(Some(listing), days)));
    Ok(())
}

/// Validate a catalog file and print a one-line summary.
pub(crate) fn run_check(path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_embedded(path)?;
    let source = path.map_or_else(|| "embedded catalog".to_string(), |p| p.display().to_string());
    println!(
        "{source}: ok ({} regions, {} entries, fallback {})",
        catalog.regions.len(),
        catalog.entry_count(),
        catalog.fallback
    );
    Ok(())
}

pub(crate) fn run_show(catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_embedded(catalog_path)?;
    for line in catalog_lines(&catalog) {
        println!("{line}");
    }
    Ok(())
}

fn describe_resolution(resolution: &Resolution<'_>) -> String {
    match resolution {
        Resolution::Matched { region, plan, code } => format!("{code} ({region} / {plan})"),
        Resolution::Unresolved {
            region: Some(region),
            code,
        } => format!("{code} (unresolved: {region} has no plan for this duration)"),
        Resolution::Unresolved { region: None, code } => {
            format!("{code} (unresolved: no region matched)")
        }
    }
}

fn catalog_lines(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec![format!("fallback: {}", catalog.fallback)];
    for region in &catalog.regions {
        lines.push(format!("{} [{}]", region.name, region.gates.join(", ")));
        for plan in &region.plans {
            let sets: Vec<String> = plan
                .phrase_sets
                .iter()
                .map(|set| set.join(" + "))
                .collect();
            lines.push(format!("  {} ({})", plan.tag, sets.join(" | ")));
            for (days, code) in &plan.durations {
                lines.push(format!("    {days:>3}d  {code}"));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
fallback: eSIM-test
regions:
  - name: japan
    gates: ["일본", "JP"]
    plans:
      - tag: JPD1G
        match: [["매일 1기가"], ["daily", "1GB"]]
        durations:
          3: eSIM-JPD1G-03
          5: eSIM-JPD1G-05
"#;

    #[test]
    fn describes_each_resolution_kind() {
        let catalog = Catalog::from_yaml_str(SMALL).unwrap();
        assert_eq!(
            describe_resolution(&catalog.resolution(Some("[JP] daily 1GB"), 3)),
            "eSIM-JPD1G-03 (japan / JPD1G)"
        );
        assert_eq!(
            describe_resolution(&catalog.resolution(Some("[JP] daily 1GB"), 4)),
            "eSIM-test (unresolved: japan has no plan for this duration)"
        );
        assert_eq!(
            describe_resolution(&catalog.resolution(Some("[유럽]"), 3)),
            "eSIM-test (unresolved: no region matched)"
        );
    }

    #[test]
    fn listing_shows_every_entry_in_order() {
        let catalog = Catalog::from_yaml_str(SMALL).unwrap();
        assert_eq!(
            catalog_lines(&catalog),
            vec![
                "fallback: eSIM-test".to_string(),
                "japan [일본, JP]".to_string(),
                "  JPD1G (매일 1기가 | daily + 1GB)".to_string(),
                "      3d  eSIM-JPD1G-03".to_string(),
                "      5d  eSIM-JPD1G-05".to_string(),
            ]
        );
    }
}
