//! Figure roster
//!
//! Owns every placed figure. Figures are stored in a [`SlotMap`] so that ids
//! stay valid across removals; a separate order list keeps output stable in
//! placement order.

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use slotmap::{new_key_type, SlotMap};

use crate::core::config::RosterConfig;

use super::figure::{Appearance, Figure, FigureRecord, Placement};
use super::role::Role;

new_key_type! {
    /// Stable handle to a figure in a [`FigureRoster`]
    pub struct FigureId;
}

/// How full the space is relative to its occupancy limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyLevel {
    /// At or below 70% of the limit
    Normal,
    /// Above 70%
    Elevated,
    /// Above 90%
    Critical,
}

/// Figure count measured against the configured limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Figures currently placed
    pub count: usize,
    /// Configured limit
    pub limit: usize,
    /// `count / limit`, capped at 1.0
    pub fraction: f32,
    /// Severity band
    pub level: OccupancyLevel,
}

impl Occupancy {
    fn measure(count: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        let fraction = (count as f32 / limit as f32).min(1.0);
        let level = if fraction > 0.9 {
            OccupancyLevel::Critical
        } else if fraction > 0.7 {
            OccupancyLevel::Elevated
        } else {
            OccupancyLevel::Normal
        };
        Self { count, limit, fraction, level }
    }
}

/// Complete export of a roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterExport {
    /// Configured occupancy limit
    pub occupancy_limit: usize,
    /// Number of figures
    pub total: usize,
    /// Figures in placement order
    pub figures: Vec<FigureRecord>,
    /// Figure count per role
    pub role_summary: BTreeMap<Role, usize>,
}

/// Ordered collection of placed figures
#[derive(Debug, Clone)]
pub struct FigureRoster {
    figures: SlotMap<FigureId, Figure>,
    order: Vec<FigureId>,
    next_serial: u32,
    config: RosterConfig,
}

impl FigureRoster {
    /// Create an empty roster
    pub fn new(config: RosterConfig) -> Self {
        Self {
            figures: SlotMap::with_key(),
            order: Vec::new(),
            next_serial: 1,
            config,
        }
    }

    /// Add a figure named after its role and a running serial
    pub fn add(&mut self, role: Role, appearance: Appearance, placement: Placement) -> FigureId {
        let name = format!("{} {}", role, self.next_serial);
        self.next_serial += 1;
        let id = self.figures.insert(Figure {
            name,
            role,
            appearance,
            manual_scale: 1.0,
            placement,
        });
        self.order.push(id);
        id
    }

    /// Look up a figure
    pub fn get(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(id)
    }

    /// Remove a figure
    pub fn remove(&mut self, id: FigureId) -> Option<Figure> {
        let figure = self.figures.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(figure)
    }

    /// Rename a figure; a blank name keeps the current one
    pub fn rename(&mut self, id: FigureId, name: &str) -> bool {
        let Some(figure) = self.figures.get_mut(id) else {
            return false;
        };
        let name = name.trim();
        if !name.is_empty() {
            figure.name = name.to_string();
        }
        true
    }

    /// Set the manual scale, clamped to the configured range
    ///
    /// Returns the value actually stored.
    pub fn set_manual_scale(&mut self, id: FigureId, scale: f32) -> Option<f32> {
        let figure = self.figures.get_mut(id)?;
        let scale = if scale.is_finite() { scale } else { 1.0 };
        figure.manual_scale = scale.max(self.config.min_manual_scale).min(self.config.max_manual_scale);
        Some(figure.manual_scale)
    }

    /// Restore the default manual scale
    pub fn reset_manual_scale(&mut self, id: FigureId) -> bool {
        self.set_manual_scale(id, 1.0).is_some()
    }

    /// Remove every figure, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.order.len();
        self.figures.clear();
        self.order.clear();
        removed
    }

    /// Number of figures
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Figures in placement order
    pub fn iter(&self) -> impl Iterator<Item = (FigureId, &Figure)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.figures.get(id).map(|figure| (id, figure)))
    }

    /// Figure count per role
    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for figure in self.figures.values() {
            *counts.entry(figure.role).or_insert(0) += 1;
        }
        counts
    }

    /// Count measured against the occupancy limit
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::measure(self.len(), self.config.occupancy_limit)
    }

    /// Serializable snapshot of the roster
    pub fn export(&self) -> RosterExport {
        RosterExport {
            occupancy_limit: self.config.occupancy_limit,
            total: self.len(),
            figures: self.iter().map(|(_, figure)| FigureRecord::from(figure)).collect(),
            role_summary: self.role_counts(),
        }
    }
}

impl Default for FigureRoster {
    fn default() -> Self {
        Self::new(RosterConfig::default())
    }
}
