//! Core inventory logic - framework-agnostic helpers behind the dashboard
//! and mobile screens.
//!
//! The pure helpers (validation, unit conversion, tax arithmetic, expiry
//! classification) need nothing but their inputs. The persisted collections
//! (tags, custom fields, approval, tax settings, unit preferences, cached
//! items) take a [`crate::storage::Storage`] handle.

/// Item approval settings and stamping
pub mod approval;
/// User-defined custom field definitions
pub mod custom_fields;
/// Expiry date classification
pub mod expiry;
/// Locally cached item collection
pub mod items;
/// Tag list management
pub mod tags;
/// Tax arithmetic and tax settings
pub mod tax;
/// Unit conversion tables and unit preferences
pub mod units;
/// Field and item form validation
pub mod validation;
