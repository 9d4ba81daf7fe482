//! Grid configuration.
//!
//! The layout code takes every tunable from an explicit [`GridConfig`]
//! threaded through constructors instead of global theme lookups. The
//! struct deserializes from TOML so hosts can ship a config file; every
//! field has a default, so an empty file or [`GridConfig::default`] yields
//! a working grid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{
    AdaptiveSizer, DEFAULT_ITEM_SIZE, DEFAULT_MIN_COLUMNS, DEFAULT_MIN_ROWS, DEFAULT_SPACING,
    GridGeometry, MIN_ITEM_SIZE, Padding,
};

/// Tunable constants for a grid view.
///
/// # Example
///
/// ```
/// use trellis::config::GridConfig;
///
/// let config = GridConfig::from_toml_str(
///     r#"
///     item_width = 96.0
///     item_height = 96.0
///     base_spacing = 8.0
///     min_columns = 4
///     min_rows = 4
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.min_columns, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Width of one item cell in pixels.
    pub item_width: f32,
    /// Height of one item cell in pixels.
    pub item_height: f32,
    /// Spacing between rows and columns before adaptive widening.
    pub base_spacing: f32,
    /// Fixed padding around the grid content.
    pub padding: Padding,
    /// Minimum number of columns the adaptive sizer must make fit.
    pub min_columns: usize,
    /// Minimum number of rows the adaptive sizer must make fit.
    pub min_rows: usize,
    /// Hard cap on columns, if any.
    pub column_limit: Option<usize>,
    /// Hard cap on rows per page, if any.
    pub row_limit: Option<usize>,
    /// Distribute spacing before the first and after the last row/column.
    pub surround_with_spacing: bool,
    /// Smallest item edge the adaptive shrink may produce.
    pub item_size_floor: f32,
    /// Base duration of a page switch animation, in milliseconds.
    pub page_switch_ms: u64,
    /// Velocity floor for flick-driven transitions, in pixels per second.
    pub min_flick_velocity: f32,
    /// Fraction of the viewport height a drag must cover to commit a page
    /// change on release.
    pub drag_commit_fraction: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_width: DEFAULT_ITEM_SIZE,
            item_height: DEFAULT_ITEM_SIZE,
            base_spacing: DEFAULT_SPACING,
            padding: Padding::ZERO,
            min_columns: DEFAULT_MIN_COLUMNS,
            min_rows: DEFAULT_MIN_ROWS,
            column_limit: None,
            row_limit: None,
            surround_with_spacing: false,
            item_size_floor: MIN_ITEM_SIZE,
            page_switch_ms: 250,
            min_flick_velocity: 800.0,
            drag_commit_fraction: 0.2,
        }
    }
}

impl GridConfig {
    /// Checks every field for a usable value.
    ///
    /// Returns the first offending field as [`Error::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        if !self.item_width.is_finite() || self.item_width < 1.0 {
            return Err(Error::invalid_config(
                "item_width",
                format!("must be a finite value of at least 1, got {}", self.item_width),
            ));
        }
        if !self.item_height.is_finite() || self.item_height < 1.0 {
            return Err(Error::invalid_config(
                "item_height",
                format!("must be a finite value of at least 1, got {}", self.item_height),
            ));
        }
        if !self.base_spacing.is_finite() || self.base_spacing < 0.0 {
            return Err(Error::invalid_config(
                "base_spacing",
                format!("must be finite and non-negative, got {}", self.base_spacing),
            ));
        }
        if self.min_columns == 0 {
            return Err(Error::invalid_config("min_columns", "must be at least 1"));
        }
        if self.min_rows == 0 {
            return Err(Error::invalid_config("min_rows", "must be at least 1"));
        }
        if self.column_limit == Some(0) {
            return Err(Error::invalid_config(
                "column_limit",
                "must be at least 1 when set",
            ));
        }
        if self.row_limit == Some(0) {
            return Err(Error::invalid_config(
                "row_limit",
                "must be at least 1 when set",
            ));
        }
        if !self.item_size_floor.is_finite() || self.item_size_floor < 1.0 {
            return Err(Error::invalid_config(
                "item_size_floor",
                format!(
                    "must be a finite value of at least 1, got {}",
                    self.item_size_floor
                ),
            ));
        }
        if !self.min_flick_velocity.is_finite() || self.min_flick_velocity <= 0.0 {
            return Err(Error::invalid_config(
                "min_flick_velocity",
                format!("must be finite and positive, got {}", self.min_flick_velocity),
            ));
        }
        if !self.drag_commit_fraction.is_finite()
            || self.drag_commit_fraction <= 0.0
            || self.drag_commit_fraction > 1.0
        {
            return Err(Error::invalid_config(
                "drag_commit_fraction",
                format!(
                    "must be in (0, 1], got {}",
                    self.drag_commit_fraction
                ),
            ));
        }
        Ok(())
    }

    /// Parses and validates a config from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::config_io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// The grid geometry these constants describe, before adaptive fitting.
    pub fn base_geometry(&self) -> GridGeometry {
        GridGeometry::new(self.item_width, self.item_height)
            .with_spacing(self.base_spacing)
            .with_padding(self.padding)
            .with_column_limit(self.column_limit)
            .with_row_limit(self.row_limit)
            .with_minimums(self.min_columns, self.min_rows)
    }

    /// An adaptive sizer seeded from this configuration.
    pub fn sizer(&self) -> AdaptiveSizer {
        AdaptiveSizer::new(self.base_geometry())
            .with_size_floor(self.item_size_floor)
            .with_surrounding_spacing(self.surround_with_spacing)
    }

    /// Base page switch duration as a [`Duration`].
    pub fn page_switch_duration(&self) -> Duration {
        Duration::from_millis(self.page_switch_ms)
    }
}

static_assertions::assert_impl_all!(GridConfig: Send, Sync);
