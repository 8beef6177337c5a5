use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every column the task table knows about.
///
/// `Project` always leads the table. The `*Key` columns always trail it and
/// are never drawn; they carry sort keys and row identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Project,
    Description,
    Urgency,
    Age,
    Tags,
    FullProject,
    Uuid,
    Due,
    Annotations,
    Active,
    DescriptionKey,
    ActiveKey,
    FullProjectKey,
    UuidKey,
}

/// Columns the user can show, hide and reorder, in canonical order
pub const CONFIGURABLE_COLUMNS: [Column; 9] = [
    Column::Description,
    Column::Urgency,
    Column::Age,
    Column::Tags,
    Column::FullProject,
    Column::Uuid,
    Column::Due,
    Column::Annotations,
    Column::Active,
];

/// Visible columns of a fresh layout, in display order
pub const DEFAULT_VISIBLE_COLUMNS: [Column; 4] =
    [Column::Description, Column::Age, Column::Due, Column::Tags];

/// Hidden columns appended to every table
pub const LOOKUP_COLUMNS: [Column; 4] = [
    Column::DescriptionKey,
    Column::ActiveKey,
    Column::FullProjectKey,
    Column::UuidKey,
];

const ALL_COLUMNS: [Column; 14] = [
    Column::Project,
    Column::Description,
    Column::Urgency,
    Column::Age,
    Column::Tags,
    Column::FullProject,
    Column::Uuid,
    Column::Due,
    Column::Annotations,
    Column::Active,
    Column::DescriptionKey,
    Column::ActiveKey,
    Column::FullProjectKey,
    Column::UuidKey,
];

impl Column {
    /// Identifier used in the config file and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Column::Project => "project",
            Column::Description => "description",
            Column::Urgency => "urg",
            Column::Age => "age",
            Column::Tags => "tags",
            Column::FullProject => "full_project",
            Column::Uuid => "uuid",
            Column::Due => "due",
            Column::Annotations => "annotations",
            Column::Active => "active",
            Column::DescriptionKey => "description_hidden",
            Column::ActiveKey => "active_hidden",
            Column::FullProjectKey => "full_project_hidden",
            Column::UuidKey => "uuid_hidden",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        ALL_COLUMNS.iter().copied().find(|c| c.name() == name)
    }

    pub fn is_lookup(self) -> bool {
        LOOKUP_COLUMNS.contains(&self)
    }

    pub fn is_configurable(self) -> bool {
        CONFIGURABLE_COLUMNS.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_name(s).ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column: Column,
    pub visible: bool,
}

/// Persisted form of a single layout entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    #[serde(default)]
    pub visible: bool,
}

/// User-configured column order and visibility.
///
/// Always holds each configurable column exactly once; stale entries from an
/// older config are reconciled away when the layout is built. The fixed
/// `project` column and the lookup columns are not stored here: they never
/// move or hide, and [`ColumnLayout::table_columns`] adds them around the
/// visible entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ColumnEntry>", into = "Vec<ColumnEntry>")]
pub struct ColumnLayout {
    definitions: Vec<ColumnDefinition>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let mut definitions: Vec<ColumnDefinition> = DEFAULT_VISIBLE_COLUMNS
            .iter()
            .map(|&column| ColumnDefinition {
                column,
                visible: true,
            })
            .collect();
        for column in CONFIGURABLE_COLUMNS {
            if !DEFAULT_VISIBLE_COLUMNS.contains(&column) {
                definitions.push(ColumnDefinition {
                    column,
                    visible: false,
                });
            }
        }
        ColumnLayout { definitions }
    }
}

impl ColumnLayout {
    /// Build a layout from persisted (name, visible) pairs.
    ///
    /// Unknown names, non-configurable columns and repeats are dropped;
    /// configurable columns that are missing are appended hidden.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut definitions: Vec<ColumnDefinition> = Vec::new();
        for (name, visible) in entries {
            let Some(column) = Column::from_name(name.as_ref()) else {
                log::debug!("dropping unknown column {:?}", name.as_ref());
                continue;
            };
            if !column.is_configurable() || definitions.iter().any(|d| d.column == column) {
                continue;
            }
            definitions.push(ColumnDefinition { column, visible });
        }
        for column in CONFIGURABLE_COLUMNS {
            if !definitions.iter().any(|d| d.column == column) {
                definitions.push(ColumnDefinition {
                    column,
                    visible: false,
                });
            }
        }
        ColumnLayout { definitions }
    }

    /// Ordered (name, visible) pairs, the inverse of [`ColumnLayout::from_entries`]
    pub fn entries(&self) -> Vec<(String, bool)> {
        self.definitions
            .iter()
            .map(|d| (d.column.name().to_string(), d.visible))
            .collect()
    }

    pub fn definitions(&self) -> &[ColumnDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.definitions.iter().position(|d| d.column == column)
    }

    /// Flip visibility of the entry at `index`. Out of range is a no-op.
    pub fn toggle_visible(&mut self, index: usize) {
        if let Some(def) = self.definitions.get_mut(index) {
            def.visible = !def.visible;
        }
    }

    /// Swap the entry at `index` with the one `offset` places away, clamped to
    /// the ends of the layout. Returns the entry's new index.
    pub fn move_column(&mut self, index: usize, offset: isize) -> usize {
        if index >= self.definitions.len() {
            return index;
        }
        let last = self.definitions.len() - 1;
        let target = index.saturating_add_signed(offset).min(last);
        self.definitions.swap(index, target);
        target
    }

    /// Visible configurable columns in display order
    pub fn visible_columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.definitions
            .iter()
            .filter(|d| d.visible)
            .map(|d| d.column)
    }

    /// Full table column list: the tree column, the visible columns, then the
    /// lookup columns
    pub fn table_columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::Project];
        columns.extend(self.visible_columns());
        columns.extend(LOOKUP_COLUMNS);
        columns
    }
}

impl From<Vec<ColumnEntry>> for ColumnLayout {
    fn from(entries: Vec<ColumnEntry>) -> Self {
        ColumnLayout::from_entries(entries.into_iter().map(|e| (e.name, e.visible)))
    }
}

impl From<ColumnLayout> for Vec<ColumnEntry> {
    fn from(layout: ColumnLayout) -> Self {
        layout
            .entries()
            .into_iter()
            .map(|(name, visible)| ColumnEntry { name, visible })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(layout: &ColumnLayout) -> Vec<&'static str> {
        layout.definitions().iter().map(|d| d.column.name()).collect()
    }

    #[test]
    fn default_layout() {
        let layout = ColumnLayout::default();
        assert_eq!(
            names(&layout),
            vec![
                "description",
                "age",
                "due",
                "tags",
                "urg",
                "full_project",
                "uuid",
                "annotations",
                "active",
            ]
        );
        let visible: Vec<_> = layout.visible_columns().collect();
        assert_eq!(visible, DEFAULT_VISIBLE_COLUMNS.to_vec());
    }

    #[test]
    fn table_columns_wraps_visible_columns() {
        let layout = ColumnLayout::default();
        assert_eq!(
            layout.table_columns(),
            vec![
                Column::Project,
                Column::Description,
                Column::Age,
                Column::Due,
                Column::Tags,
                Column::DescriptionKey,
                Column::ActiveKey,
                Column::FullProjectKey,
                Column::UuidKey,
            ]
        );
    }

    #[test]
    fn entries_round_trip() {
        let mut layout = ColumnLayout::default();
        layout.toggle_visible(5);
        layout.move_column(5, -3);
        let rebuilt = ColumnLayout::from_entries(layout.entries());
        assert_eq!(rebuilt, layout);
    }

    #[test]
    fn unknown_columns_are_dropped_and_missing_appended() {
        let layout = ColumnLayout::from_entries([
            ("bogus", true),
            ("tags", true),
            ("description", false),
        ]);
        assert_eq!(layout.len(), CONFIGURABLE_COLUMNS.len());
        assert_eq!(names(&layout)[..2], ["tags", "description"]);
        assert!(layout.position(Column::Tags).is_some());
        for column in CONFIGURABLE_COLUMNS {
            assert!(layout.position(column).is_some(), "{column} missing");
        }
        // Appended columns are hidden
        let visible: Vec<_> = layout.visible_columns().collect();
        assert_eq!(visible, vec![Column::Tags]);
    }

    #[test]
    fn fixed_columns_and_repeats_are_dropped() {
        let layout = ColumnLayout::from_entries([
            ("project", true),
            ("uuid_hidden", true),
            ("age", true),
            ("age", false),
        ]);
        assert_eq!(names(&layout)[0], "age");
        assert_eq!(layout.len(), CONFIGURABLE_COLUMNS.len());
        assert!(layout.definitions()[0].visible);
        assert_eq!(layout.position(Column::Project), None);
    }

    #[test]
    fn toggle_visible() {
        let mut layout = ColumnLayout::default();
        assert!(layout.definitions()[0].visible);
        layout.toggle_visible(0);
        assert!(!layout.definitions()[0].visible);
        layout.toggle_visible(0);
        assert!(layout.definitions()[0].visible);
        // Out of range is ignored
        let before = layout.clone();
        layout.toggle_visible(99);
        assert_eq!(layout, before);
    }

    #[test]
    fn move_column_swaps_neighbours() {
        let mut layout = ColumnLayout::default();
        let new_index = layout.move_column(1, 1);
        assert_eq!(new_index, 2);
        assert_eq!(names(&layout)[..3], ["description", "due", "age"]);
    }

    #[test]
    fn move_column_clamps_at_edges() {
        let mut layout = ColumnLayout::default();
        let before = layout.clone();
        assert_eq!(layout.move_column(0, -1), 0);
        assert_eq!(layout, before);
        let last = layout.len() - 1;
        assert_eq!(layout.move_column(last, 5), last);
        assert_eq!(layout, before);
        // A large jump swaps with the far end
        assert_eq!(layout.move_column(1, 100), last);
        assert_eq!(names(&layout)[last], "age");
        assert_eq!(names(&layout)[1], "active");
    }

    #[test]
    fn serde_round_trip_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            columns: ColumnLayout,
        }
        let mut layout = ColumnLayout::default();
        layout.toggle_visible(4);
        let text = toml::to_string(&Wrapper {
            columns: layout.clone(),
        })
        .unwrap();
        assert!(text.contains("[[columns]]"));
        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.columns, layout);
    }

    #[test]
    fn column_names_parse() {
        for column in ALL_COLUMNS {
            assert_eq!(column.name().parse::<Column>(), Ok(column));
        }
        assert_eq!(
            "bogus".parse::<Column>(),
            Err(UnknownColumn("bogus".to_string()))
        );
    }
}
