use super::Catalog;

/// Outcome of a catalog lookup, with enough context to explain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched {
        region: &'a str,
        plan: &'a str,
        code: &'a str,
    },
    /// `region` is set when a region gate matched but none of its plans
    /// produced a code. Other regions are not consulted in that case.
    Unresolved {
        region: Option<&'a str>,
        code: &'a str,
    },
}

impl<'a> Resolution<'a> {
    /// The catalog code to submit. Always non-empty.
    #[must_use]
    pub fn code(&self) -> &'a str {
        match self {
            Resolution::Matched { code, .. } | Resolution::Unresolved { code, .. } => code,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}

impl Catalog {
    /// Map a listing text and day count to a catalog code.
    ///
    /// Never fails: missing text, an unknown region, or a day count with no
    /// exact entry all yield the fallback code.
    #[must_use]
    pub fn resolve(&self, listing: Option<&str>, duration_days: i64) -> &str {
        let resolution = self.resolution(listing, duration_days);
        match resolution {
            Resolution::Matched { region, plan, code } => {
                tracing::debug!(region, plan, duration_days, code, "catalog code resolved");
            }
            Resolution::Unresolved { region, code } => {
                tracing::warn!(
                    listing = listing.unwrap_or_default(),
                    region = region.unwrap_or("none"),
                    duration_days,
                    code,
                    "listing did not resolve; returning fallback code"
                );
            }
        }
        resolution.code()
    }

    /// Same lookup as [`Catalog::resolve`], without logging, reporting which
    /// rule decided the result.
    #[must_use]
    pub fn resolution(&self, listing: Option<&str>, duration_days: i64) -> Resolution<'_> {
        let fallback = Resolution::Unresolved {
            region: None,
            code: &self.fallback,
        };

        let Some(text) = listing.filter(|t| !t.is_empty()) else {
            return fallback;
        };
        let Some(region) = self.region_for(text) else {
            return fallback;
        };

        region
            .plans
            .iter()
            .filter(|plan| plan.matches(text))
            .find_map(|plan| {
                plan.code_for(duration_days)
                    .map(|code| Resolution::Matched {
                        region: &region.name,
                        plan: &plan.tag,
                        code,
                    })
            })
            .unwrap_or(Resolution::Unresolved {
                region: Some(region.name.as_str()),
                code: &self.fallback,
            })
    }
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
