//! Views over a finished coloring: class sizes, per-class node layouts and
//! summary statistics.

use std::collections::{BTreeMap, HashMap};

use ordered_float::NotNan;

use crate::graph::NodeId;
use crate::k1coloring::ColoringResult;
use crate::storage::{Color, UsedColors, INITIAL_FORBIDDEN_COLOR};

impl ColoringResult {
    /// Number of distinct colors held by some node.
    pub fn color_count(&self) -> usize {
        self.used_colors().count()
    }

    /// Number of nodes holding each used color.
    pub fn color_sizes(&self) -> BTreeMap<Color, usize> {
        let mut sizes = BTreeMap::new();
        for &c in self.colors() {
            if c != INITIAL_FORBIDDEN_COLOR {
                *sizes.entry(c).or_insert(0) += 1;
            }
        }
        sizes
    }

    /// The color of every node whose color class has at least `min_size`
    /// members, `None` for the rest.
    pub fn colors_with_min_size(&self, min_size: usize) -> Vec<Option<Color>> {
        let sizes = self.color_sizes();
        self.colors()
            .iter()
            .map(|c| match sizes.get(c) {
                Some(&size) if size >= min_size => Some(*c),
                _ => None,
            })
            .collect()
    }
}

/// Nodes laid out contiguously by color, so each color class can be
/// processed as one independent parallel phase.
pub struct ColorClasses {
    colors: Vec<Color>,
    starts: Vec<usize>,
    nodes: Vec<NodeId>,
}

impl ColorClasses {
    /// Uncolored nodes are left out.
    pub fn new(colors: &[Color], used: &UsedColors) -> Self {
        let palette: Vec<Color> = used.iter().collect();
        let index: HashMap<Color, usize> = palette.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let mut starts = vec![0usize; palette.len() + 1];
        for c in colors {
            if let Some(&i) = index.get(c) {
                starts[i + 1] += 1;
            }
        }
        for i in 1..starts.len() {
            starts[i] += starts[i - 1];
        }

        let mut cursor = starts.clone();
        let mut nodes = vec![0; starts[palette.len()]];
        for (v, c) in colors.iter().enumerate() {
            if let Some(&i) = index.get(c) {
                nodes[cursor[i]] = v as NodeId;
                cursor[i] += 1;
            }
        }

        Self {
            colors: palette,
            starts,
            nodes,
        }
    }

    pub fn number_of_colors(&self) -> usize {
        self.colors.len()
    }

    /// The color of the `index`-th class, classes ordered by color.
    pub fn color_at(&self, index: usize) -> Color {
        self.colors[index]
    }

    /// Nodes of the `index`-th class, in increasing id order.
    pub fn nodes_of(&self, index: usize) -> &[NodeId] {
        &self.nodes[self.starts[index]..self.starts[index + 1]]
    }

    /// Class cardinalities in class order.
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.starts.windows(2).map(|s| s[1] - s[0])
    }
}

const NSTAT_PERCENTILES: usize = 11;
const STAT_PERCENTILES: [f64; NSTAT_PERCENTILES] = [
    0.0, 0.001, 0.01, 0.05, 0.10, 0.50, 0.90, 0.95, 0.99, 0.999, 1.0,
];

/// Mean and percentiles over a sample, e.g. color class sizes.
pub struct SummaryStats {
    mean: f64,
    percentiles: [f64; NSTAT_PERCENTILES],
}

impl SummaryStats {
    /// `None` for an empty sample or one containing NaN.
    pub fn from(it: impl Iterator<Item = f64>) -> Option<Self> {
        let mut v: Vec<NotNan<f64>> = it.map(NotNan::new).collect::<Result<_, _>>().ok()?;
        if v.is_empty() {
            return None;
        }
        v.sort_unstable();
        let mut stats = SummaryStats {
            mean: v.iter().map(|f| f.into_inner()).sum::<f64>() / v.len() as f64,
            percentiles: Default::default(),
        };
        STAT_PERCENTILES
            .iter()
            .copied()
            .map(|f| v[((v.len() - 1) as f64 * f) as usize].into_inner())
            .zip(stats.percentiles.iter_mut())
            .for_each(|(val, p)| *p = val);
        Some(stats)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> f64 {
        self.percentiles[0]
    }

    pub fn max(&self) -> f64 {
        self.percentiles[NSTAT_PERCENTILES - 1]
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut map: HashMap<_, _> = STAT_PERCENTILES
            .iter()
            .map(|f| format!("p{:.3}", f))
            .zip(self.percentiles.iter().copied())
            .collect();
        map.insert("mean".to_string(), self.mean);
        map
    }
}
