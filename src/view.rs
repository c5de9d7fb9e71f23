use std::fmt;

use crate::color::Palette;
use crate::data::columns::{
    COUNTRY, FREEDOM, GDP_PER_CAPITA, HAPPINESS_SCORE, LIFE_EXPECTANCY, REGION, SOCIAL_SUPPORT,
};
use crate::data::model::Dataset;
use crate::data::stats::{self, Bin, CorrelationMatrix, KDE_GRID_SIZE};

/// Rows shown in each half of the ranking view.
pub const RANKING_SIZE: usize = 10;

/// Candidate columns for the pairwise grid, in display order.
pub const PAIRWISE_COLUMNS: [&str; 5] = [
    HAPPINESS_SCORE,
    GDP_PER_CAPITA,
    SOCIAL_SUPPORT,
    LIFE_EXPECTANCY,
    FREEDOM,
];

// ---------------------------------------------------------------------------
// View – one entry of the navigation menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Ranking,
    GdpVsHappiness,
    SocialSupportVsHappiness,
    HappinessDistribution,
    CorrelationHeatmap,
    PairwiseRelationships,
}

impl View {
    /// Menu order.
    pub const ALL: [View; 6] = [
        View::Ranking,
        View::GdpVsHappiness,
        View::SocialSupportVsHappiness,
        View::HappinessDistribution,
        View::CorrelationHeatmap,
        View::PairwiseRelationships,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Ranking => "Top & Bottom 10 Countries",
            View::GdpVsHappiness => "GDP vs Happiness",
            View::SocialSupportVsHappiness => "Social Support vs Happiness",
            View::HappinessDistribution => "Happiness Distribution",
            View::CorrelationHeatmap => "Correlation Heatmap",
            View::PairwiseRelationships => "Pairwise Relationships",
        }
    }

    /// Section heading shown above a successfully prepared chart.
    pub fn heading(self) -> &'static str {
        match self {
            View::Ranking => "🏆 Top & Bottom 10 Happiest Countries",
            View::GdpVsHappiness => "💰 GDP per Capita vs Happiness Score",
            View::SocialSupportVsHappiness => "👫 Social Support vs Happiness Score",
            View::HappinessDistribution => "📈 Distribution of Happiness Scores",
            View::CorrelationHeatmap => "🔥 Correlation Between Key Happiness Factors",
            View::PairwiseRelationships => "🔗 Pairwise Relationships Between Key Factors",
        }
    }

    /// Columns that must all be present. The pairwise view instead needs any
    /// two of [`PAIRWISE_COLUMNS`]; the heatmap needs any numeric column.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            View::Ranking => &[HAPPINESS_SCORE, COUNTRY],
            View::GdpVsHappiness => &[GDP_PER_CAPITA, HAPPINESS_SCORE],
            View::SocialSupportVsHappiness => &[SOCIAL_SUPPORT, HAPPINESS_SCORE],
            View::HappinessDistribution => &[HAPPINESS_SCORE],
            View::CorrelationHeatmap | View::PairwiseRelationships => &[],
        }
    }

    fn missing_summary(self) -> &'static str {
        match self {
            View::Ranking => "Required columns not found in dataset.",
            View::GdpVsHappiness => "GDP or Happiness Score column missing.",
            View::SocialSupportVsHappiness => "Social Support or Happiness Score column missing.",
            View::HappinessDistribution => "Happiness Score column missing.",
            View::CorrelationHeatmap | View::PairwiseRelationships => "Required columns missing.",
        }
    }

    /// Check the view's columns and compute its chart.
    ///
    /// The existence check runs first; when it fails nothing is computed.
    pub fn prepare(self, dataset: &Dataset) -> Result<Chart, ViewError> {
        let missing: Vec<&'static str> = self
            .required_columns()
            .iter()
            .copied()
            .filter(|c| !dataset.has_column(c))
            .collect();
        if !missing.is_empty() {
            return Err(ViewError::MissingColumns {
                summary: self.missing_summary(),
                missing,
            });
        }

        match self {
            View::Ranking => ranking(dataset).map(Chart::Ranking),
            View::GdpVsHappiness => scatter(
                dataset,
                GDP_PER_CAPITA,
                "GDP per Capita",
                "GDP vs Happiness Across Regions",
                Palette::Viridis,
            )
            .map(Chart::Scatter),
            View::SocialSupportVsHappiness => scatter(
                dataset,
                SOCIAL_SUPPORT,
                "Social Support",
                "Social Support vs Happiness Across Regions",
                Palette::Coolwarm,
            )
            .map(Chart::Scatter),
            View::HappinessDistribution => distribution(dataset).map(Chart::Histogram),
            View::CorrelationHeatmap => {
                let matrix = stats::correlation_matrix(dataset);
                if matrix.labels.is_empty() {
                    return Err(ViewError::NoNumericColumns);
                }
                Ok(Chart::Heatmap(matrix))
            }
            View::PairwiseRelationships => pair_grid(dataset).map(Chart::PairGrid),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a view cannot be drawn. Shown to the user in place of the chart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("{summary} (missing: {})", .missing.join(", "))]
    MissingColumns {
        summary: &'static str,
        missing: Vec<&'static str>,
    },
    #[error("Column '{0}' does not hold numeric values.")]
    NotNumeric(&'static str),
    #[error("Not enough numeric columns for pairwise visualization.")]
    TooFewPairColumns,
    #[error("No numeric columns available for correlation.")]
    NoNumericColumns,
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Everything a renderer needs to draw one view.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Ranking(Ranking),
    Scatter(Scatter),
    Histogram(Histogram),
    Heatmap(CorrelationMatrix),
    PairGrid(PairGrid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Highest score first.
    pub top: Vec<RankedBar>,
    /// Lowest score first.
    pub bottom: Vec<RankedBar>,
}

/// One set of same-coloured points; `name` is the region when grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub palette: Palette,
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    /// Density curve scaled to bin counts, empty when it cannot be estimated.
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairGrid {
    pub columns: Vec<&'static str>,
    /// Complete rows only, stored column by column.
    pub values: Vec<Vec<f64>>,
    /// Diagonal density curve per column.
    pub densities: Vec<Vec<[f64; 2]>>,
}

impl PairGrid {
    pub fn rows(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Points for the cell at grid row `row` (y) and column `col` (x).
    pub fn points(&self, row: usize, col: usize) -> Vec<[f64; 2]> {
        self.values[col]
            .iter()
            .zip(&self.values[row])
            .map(|(&x, &y)| [x, y])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn numeric(dataset: &Dataset, name: &'static str) -> Result<Vec<Option<f64>>, ViewError> {
    match dataset.column(name) {
        Some(col) if col.is_numeric() => Ok(col.numbers()),
        Some(_) => Err(ViewError::NotNumeric(name)),
        None => Err(ViewError::MissingColumns {
            summary: "Required columns missing.",
            missing: vec![name],
        }),
    }
}

fn ranking(dataset: &Dataset) -> Result<Ranking, ViewError> {
    let scores = numeric(dataset, HAPPINESS_SCORE)?;
    let bars = |rows: Vec<usize>| -> Vec<RankedBar> {
        rows.into_iter()
            .filter_map(|row| {
                Some(RankedBar {
                    label: dataset.label(COUNTRY, row)?,
                    value: scores[row]?,
                })
            })
            .collect()
    };
    Ok(Ranking {
        top: bars(stats::nlargest(&scores, RANKING_SIZE)),
        bottom: bars(stats::nsmallest(&scores, RANKING_SIZE)),
    })
}

fn scatter(
    dataset: &Dataset,
    x_column: &'static str,
    x_label: &'static str,
    title: &'static str,
    palette: Palette,
) -> Result<Scatter, ViewError> {
    let xs = numeric(dataset, x_column)?;
    let ys = numeric(dataset, HAPPINESS_SCORE)?;
    let pairs = xs
        .iter()
        .zip(&ys)
        .enumerate()
        .filter_map(|(row, (x, y))| Some((row, [(*x)?, (*y)?])));

    let groups = match dataset.column(REGION) {
        Some(region) => {
            let mut groups: Vec<ScatterGroup> = Vec::new();
            for (row, point) in pairs {
                let cell = &region.cells[row];
                if cell.is_missing() {
                    continue;
                }
                let name = cell.to_string();
                match groups.iter_mut().find(|g| g.name.as_deref() == Some(&name)) {
                    Some(group) => group.points.push(point),
                    None => groups.push(ScatterGroup {
                        name: Some(name),
                        points: vec![point],
                    }),
                }
            }
            groups
        }
        None => vec![ScatterGroup {
            name: None,
            points: pairs.map(|(_, p)| p).collect(),
        }],
    };

    Ok(Scatter {
        title,
        x_label,
        y_label: "Happiness Score",
        palette,
        groups,
    })
}

fn distribution(dataset: &Dataset) -> Result<Histogram, ViewError> {
    let scores: Vec<f64> = numeric(dataset, HAPPINESS_SCORE)?
        .into_iter()
        .flatten()
        .collect();
    let bins = stats::histogram(&scores);

    // Scale the density to counts so it overlays the bars.
    let bin_width = bins.first().map_or(1.0, Bin::width);
    let n = scores.len() as f64;
    let kde = stats::gaussian_kde(&scores, 0.0, KDE_GRID_SIZE)
        .unwrap_or_default()
        .into_iter()
        .map(|[x, d]| [x, d * n * bin_width])
        .collect();

    Ok(Histogram { bins, kde })
}

fn pair_grid(dataset: &Dataset) -> Result<PairGrid, ViewError> {
    let columns: Vec<&'static str> = PAIRWISE_COLUMNS
        .iter()
        .copied()
        .filter(|c| dataset.has_column(c))
        .collect();
    if columns.len() < 2 {
        return Err(ViewError::TooFewPairColumns);
    }

    let series = columns
        .iter()
        .map(|&c| numeric(dataset, c))
        .collect::<Result<Vec<_>, _>>()?;
    let values = stats::complete_rows(&series);
    let densities = values
        .iter()
        .map(|v| stats::gaussian_kde(v, 3.0, KDE_GRID_SIZE).unwrap_or_default())
        .collect();

    Ok(PairGrid {
        columns,
        values,
        densities,
    })
}
