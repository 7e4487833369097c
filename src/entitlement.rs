//! Subscription tiers and the entitlement gate
//!
//! The gate is a pure lookup from a subscription tier to the export formats
//! it unlocks. It is the only place where export permission is decided; the
//! action facade asks it before doing any work.

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ─────────────────────────────────────────────────────────────────────────────
// Subscription Tier
// ─────────────────────────────────────────────────────────────────────────────

/// Subscription plans known to the export pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl SubscriptionTier {
    /// Parse the tier string supplied by the account layer.
    ///
    /// Matching is case-insensitive. Unknown strings resolve to `Free` so an
    /// unrecognized plan never unlocks anything.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => SubscriptionTier::Free,
            "pro" => SubscriptionTier::Pro,
            "business" => SubscriptionTier::Business,
            other => {
                warn!("Unknown subscription tier '{}', treating as free", other);
                SubscriptionTier::Free
            }
        }
    }

    /// Get the display label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Pro => "Pro",
            SubscriptionTier::Business => "Business",
        }
    }

    /// Get all tiers.
    pub fn all() -> &'static [SubscriptionTier] {
        &[
            SubscriptionTier::Free,
            SubscriptionTier::Pro,
            SubscriptionTier::Business,
        ]
    }

    /// Join tier labels for prose: "Pro", "Pro and Business", "A, B and C".
    pub fn join_labels(tiers: &[SubscriptionTier]) -> String {
        match tiers {
            [] => "paid".to_string(),
            [only] => only.label().to_string(),
            [head @ .., last] => {
                let head: Vec<&str> = head.iter().map(|t| t.label()).collect();
                format!("{} and {}", head.join(", "), last.label())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entitlement
// ─────────────────────────────────────────────────────────────────────────────

/// What a single tier may export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    /// The tier this entitlement belongs to
    pub tier: SubscriptionTier,
    /// Every format the tier may produce, including `Document` when unlocked
    pub allowed_formats: BTreeSet<ExportFormat>,
    /// Whether the tier may produce document containers
    pub allows_document_export: bool,
    /// Format used for plain downloads when the preference is not honored
    pub default_format: ExportFormat,
    /// Whether the configured download preference is honored at all
    pub honors_preference: bool,
}

impl Entitlement {
    /// Whether `format` may be produced under this entitlement.
    pub fn permits(&self, format: ExportFormat) -> bool {
        self.allowed_formats.contains(&format)
    }

    /// Pick the format for a plain download.
    ///
    /// Tiers that do not honor preferences always get their default format.
    /// Document is never a plain download format.
    pub fn resolve_download_format(&self, preferred: ExportFormat) -> ExportFormat {
        if self.honors_preference && preferred != ExportFormat::Document && self.permits(preferred)
        {
            preferred
        } else {
            self.default_format
        }
    }

    fn free() -> Self {
        Self {
            tier: SubscriptionTier::Free,
            allowed_formats: [ExportFormat::RasterPng].into_iter().collect(),
            allows_document_export: false,
            default_format: ExportFormat::RasterPng,
            honors_preference: false,
        }
    }

    fn elevated(tier: SubscriptionTier, allows_document_export: bool) -> Self {
        let mut allowed_formats: BTreeSet<ExportFormat> = [
            ExportFormat::Vector,
            ExportFormat::RasterPng,
            ExportFormat::RasterJpeg,
        ]
        .into_iter()
        .collect();
        if allows_document_export {
            allowed_formats.insert(ExportFormat::Document);
        }

        Self {
            tier,
            allowed_formats,
            allows_document_export,
            default_format: ExportFormat::RasterPng,
            honors_preference: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entitlement Table (the gate)
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable tier → entitlement lookup.
///
/// Which elevated tiers may export documents is a constructor parameter;
/// `Free` never can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementTable {
    entries: BTreeMap<SubscriptionTier, Entitlement>,
}

impl EntitlementTable {
    /// Build the table with the given set of document-export tiers.
    pub fn new(document_export_tiers: &[SubscriptionTier]) -> Self {
        if document_export_tiers.contains(&SubscriptionTier::Free) {
            warn!("Ignoring document export for the free tier");
        }

        let entries = SubscriptionTier::all()
            .iter()
            .map(|&tier| {
                let entitlement = match tier {
                    SubscriptionTier::Free => Entitlement::free(),
                    elevated => {
                        Entitlement::elevated(elevated, document_export_tiers.contains(&elevated))
                    }
                };
                (tier, entitlement)
            })
            .collect();

        Self { entries }
    }

    /// Look up the entitlement for a tier.
    pub fn entitlement(&self, tier: SubscriptionTier) -> &Entitlement {
        // Every tier is inserted by `new`
        &self.entries[&tier]
    }

    /// Check that `tier` may produce `format`.
    ///
    /// Returns `Error::NotEntitled` naming the tiers that would unlock it.
    pub fn check(&self, tier: SubscriptionTier, format: ExportFormat) -> Result<&Entitlement> {
        let entitlement = self.entitlement(tier);
        if entitlement.permits(format) {
            return Ok(entitlement);
        }

        Err(Error::NotEntitled {
            tier,
            format,
            unlocked_by: self.tiers_permitting(format),
        })
    }

    /// All tiers that may produce `format`, in tier order.
    pub fn tiers_permitting(&self, format: ExportFormat) -> Vec<SubscriptionTier> {
        self.entries
            .values()
            .filter(|e| e.permits(format))
            .map(|e| e.tier)
            .collect()
    }
}

impl Default for EntitlementTable {
    fn default() -> Self {
        Self::new(&[SubscriptionTier::Pro, SubscriptionTier::Business])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tiers() {
        assert_eq!(SubscriptionTier::parse("free"), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::parse("Pro"), SubscriptionTier::Pro);
        assert_eq!(SubscriptionTier::parse(" BUSINESS "), SubscriptionTier::Business);
    }

    #[test]
    fn test_parse_unknown_tier_is_free() {
        assert_eq!(SubscriptionTier::parse("enterprise"), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::parse(""), SubscriptionTier::Free);
    }

    #[test]
    fn test_join_labels() {
        assert_eq!(SubscriptionTier::join_labels(&[]), "paid");
        assert_eq!(SubscriptionTier::join_labels(&[SubscriptionTier::Pro]), "Pro");
        assert_eq!(
            SubscriptionTier::join_labels(&[SubscriptionTier::Pro, SubscriptionTier::Business]),
            "Pro and Business"
        );
        assert_eq!(
            SubscriptionTier::join_labels(SubscriptionTier::all()),
            "Free, Pro and Business"
        );
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let table = EntitlementTable::default();
        for &tier in SubscriptionTier::all() {
            let first = table.entitlement(tier).clone();
            let second = table.entitlement(tier).clone();
            assert_eq!(first, second);
            assert_eq!(first.allowed_formats, second.allowed_formats);
        }
    }

    #[test]
    fn test_free_is_raster_only() {
        let table = EntitlementTable::default();
        let free = table.entitlement(SubscriptionTier::Free);
        assert!(!free.allows_document_export);
        assert_eq!(free.allowed_formats.len(), 1);
        assert!(free.permits(ExportFormat::RasterPng));
        assert!(!free.permits(ExportFormat::Vector));
        assert!(!free.permits(ExportFormat::Document));
    }

    #[test]
    fn test_free_download_ignores_preference() {
        let table = EntitlementTable::default();
        let free = table.entitlement(SubscriptionTier::Free);
        assert_eq!(
            free.resolve_download_format(ExportFormat::Vector),
            ExportFormat::RasterPng
        );
        assert_eq!(
            free.resolve_download_format(ExportFormat::RasterJpeg),
            ExportFormat::RasterPng
        );
    }

    #[test]
    fn test_elevated_download_honors_preference() {
        let table = EntitlementTable::default();
        let pro = table.entitlement(SubscriptionTier::Pro);
        assert_eq!(
            pro.resolve_download_format(ExportFormat::Vector),
            ExportFormat::Vector
        );
        assert_eq!(
            pro.resolve_download_format(ExportFormat::RasterJpeg),
            ExportFormat::RasterJpeg
        );
        // Document is a separate action, never a plain download
        assert_eq!(
            pro.resolve_download_format(ExportFormat::Document),
            ExportFormat::RasterPng
        );
    }

    #[test]
    fn test_document_tiers_are_configurable() {
        let pro_only = EntitlementTable::new(&[SubscriptionTier::Pro]);
        assert!(pro_only.entitlement(SubscriptionTier::Pro).allows_document_export);
        assert!(!pro_only.entitlement(SubscriptionTier::Business).allows_document_export);
        assert!(pro_only
            .check(SubscriptionTier::Business, ExportFormat::Document)
            .is_err());

        let both = EntitlementTable::default();
        assert!(both.entitlement(SubscriptionTier::Business).allows_document_export);
    }

    #[test]
    fn test_free_never_gets_documents() {
        let table = EntitlementTable::new(SubscriptionTier::all());
        assert!(!table.entitlement(SubscriptionTier::Free).allows_document_export);
    }

    #[test]
    fn test_check_reports_unlocking_tiers() {
        let table = EntitlementTable::default();
        match table.check(SubscriptionTier::Free, ExportFormat::Document) {
            Err(Error::NotEntitled {
                tier,
                format,
                unlocked_by,
            }) => {
                assert_eq!(tier, SubscriptionTier::Free);
                assert_eq!(format, ExportFormat::Document);
                assert_eq!(
                    unlocked_by,
                    vec![SubscriptionTier::Pro, SubscriptionTier::Business]
                );
            }
            other => panic!("Expected NotEntitled, got {:?}", other),
        }
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_string(&SubscriptionTier::Business).unwrap();
        assert_eq!(json, "\"business\"");
        let tier: SubscriptionTier = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(tier, SubscriptionTier::Pro);
    }
}
