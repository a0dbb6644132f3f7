use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The three filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Platform,
    ContentType,
    Year,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Platform, Dimension::ContentType, Dimension::Year];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Platform => "Platform",
            Dimension::ContentType => "Content Type",
            Dimension::Year => "Year",
        }
    }
}

/// Allowed values per dimension. A record passes when each of its three
/// values is in the matching set; an empty set therefore passes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub platforms: BTreeSet<String>,
    pub content_types: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

impl FilterSelection {
    /// Everything observed in the dataset selected (i.e., show everything).
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            platforms: dataset.platforms.clone(),
            content_types: dataset.content_types.clone(),
            years: dataset.years.clone(),
        }
    }

    /// Whether a single record passes all three dimensions.
    pub fn matches(&self, rec: &Record) -> bool {
        let platform_ok = rec
            .platform
            .as_ref()
            .is_some_and(|p| self.platforms.contains(p));
        let content_ok = rec
            .content_type
            .as_ref()
            .is_some_and(|c| self.content_types.contains(c));
        platform_ok && content_ok && self.years.contains(&rec.year)
    }

    /// Flip one value in `dim`; unparseable years are ignored.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        match dim {
            Dimension::Platform => toggle(&mut self.platforms, value.to_string()),
            Dimension::ContentType => toggle(&mut self.content_types, value.to_string()),
            Dimension::Year => {
                if let Ok(y) = value.parse::<i32>() {
                    toggle(&mut self.years, y);
                }
            }
        }
    }

    /// Select every value the dataset has for `dim`.
    pub fn select_all(&mut self, dim: Dimension, dataset: &Dataset) {
        match dim {
            Dimension::Platform => self.platforms = dataset.platforms.clone(),
            Dimension::ContentType => self.content_types = dataset.content_types.clone(),
            Dimension::Year => self.years = dataset.years.clone(),
        }
    }

    /// Deselect every value of `dim`.
    pub fn select_none(&mut self, dim: Dimension) {
        match dim {
            Dimension::Platform => self.platforms.clear(),
            Dimension::ContentType => self.content_types.clear(),
            Dimension::Year => self.years.clear(),
        }
    }

    /// Selected values of `dim` as display strings, sorted.
    pub fn values(&self, dim: Dimension) -> Vec<String> {
        match dim {
            Dimension::Platform => self.platforms.iter().cloned().collect(),
            Dimension::ContentType => self.content_types.iter().cloned().collect(),
            Dimension::Year => self.years.iter().map(|y| y.to_string()).collect(),
        }
    }

    /// Whether `value` is selected in `dim`.
    pub fn contains(&self, dim: Dimension, value: &str) -> bool {
        match dim {
            Dimension::Platform => self.platforms.contains(value),
            Dimension::ContentType => self.content_types.contains(value),
            Dimension::Year => value
                .parse::<i32>()
                .is_ok_and(|y| self.years.contains(&y)),
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// All values the dataset has for `dim`, as display strings.
pub fn dimension_values(dataset: &Dataset, dim: Dimension) -> Vec<String> {
    FilterSelection::all(dataset).values(dim)
}

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The dataset restricted to the records a selection lets through.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub dataset: &'a Dataset,
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a Dataset, selection: &FilterSelection) -> Self {
        Self {
            dataset,
            indices: filtered_indices(dataset, selection),
        }
    }

    /// Every record, unfiltered.
    pub fn unfiltered(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }
}
