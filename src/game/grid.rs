use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Supported ticket geometries.
///
/// Serialized as `"3x3"`, `"4x4"` or `"5x5"`. Parsing also accepts the bare
/// dimension (`"4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GridSize {
    Three,
    Four,
    Five,
}

impl GridSize {
    pub const ALL: [GridSize; 3] = [GridSize::Three, GridSize::Four, GridSize::Five];

    pub fn from_dimension(n: usize) -> Option<Self> {
        match n {
            3 => Some(GridSize::Three),
            4 => Some(GridSize::Four),
            5 => Some(GridSize::Five),
            _ => None,
        }
    }

    /// Side length N of the N×N grid
    pub fn dimension(self) -> usize {
        match self {
            GridSize::Three => 3,
            GridSize::Four => 4,
            GridSize::Five => 5,
        }
    }

    pub fn cell_count(self) -> usize {
        self.dimension() * self.dimension()
    }

    /// Rows plus columns. Diagonals are never scored.
    pub fn line_count(self) -> usize {
        self.dimension() * 2
    }

    /// Row-major indices of the four corner cells
    pub fn corner_indices(self) -> [usize; 4] {
        let n = self.dimension();
        [0, n - 1, n * (n - 1), n * n - 1]
    }

    /// Smallest number universe a game of this size may be created with
    pub fn min_numbers(self) -> usize {
        match self {
            GridSize::Three => 14,
            GridSize::Four => 24,
            GridSize::Five => 38,
        }
    }

    /// Tickets that must exist before the first number is drawn
    pub fn min_tickets(self) -> usize {
        match self {
            GridSize::Three => 5,
            GridSize::Four => 11,
            GridSize::Five => 18,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.dimension();
        write!(f, "{}x{}", n, n)
    }
}

impl FromStr for GridSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let dimension = match s.split_once(['x', 'X']) {
            Some((rows, cols)) => {
                let rows: usize = rows.trim().parse()?;
                let cols: usize = cols.trim().parse()?;
                if rows != cols {
                    bail!("Grid must be square: {}", s);
                }
                rows
            }
            None => s.parse()?,
        };
        match GridSize::from_dimension(dimension) {
            Some(size) => Ok(size),
            None => bail!("Unsupported grid size '{}' (expected 3x3, 4x4 or 5x5)", s),
        }
    }
}

impl TryFrom<String> for GridSize {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<GridSize> for String {
    fn from(size: GridSize) -> Self {
        size.to_string()
    }
}

/// One square of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Number(u32),
    /// Free space: counts as filled for lines and corners, never as a matched cell
    Free,
    Empty,
}

const FREE_MARKER: &str = "FREE";

impl Cell {
    pub fn number(self) -> Option<u32> {
        match self {
            Cell::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, Cell::Free)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Free => f.write_str(FREE_MARKER),
            Cell::Empty => f.write_str("_"),
        }
    }
}

impl FromStr for Cell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "" | "_" | "-" => Ok(Cell::Empty),
            "*" => Ok(Cell::Free),
            _ if s.eq_ignore_ascii_case(FREE_MARKER) => Ok(Cell::Free),
            _ => {
                let n: u32 = s
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid cell '{}': expected a number, FREE or _", s))?;
                if n == 0 {
                    bail!("Invalid cell '0': numbers must be positive");
                }
                Ok(Cell::Number(n))
            }
        }
    }
}

/// Parse a comma or whitespace separated row-major cell list, e.g. `"1,2,FREE,_"`.
pub fn parse_cells(input: &str) -> Result<Vec<Cell>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

// JSON form: integer, "FREE", or null
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(u32),
    Marker(String),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Number(n) => serializer.serialize_u32(*n),
            Cell::Free => serializer.serialize_str(FREE_MARKER),
            Cell::Empty => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<RawCell>::deserialize(deserializer)? {
            None => Ok(Cell::Empty),
            Some(RawCell::Number(0)) => Err(serde::de::Error::custom("cell numbers must be positive")),
            Some(RawCell::Number(n)) => Ok(Cell::Number(n)),
            Some(RawCell::Marker(m)) if m == FREE_MARKER => Ok(Cell::Free),
            Some(RawCell::Marker(m)) => Err(serde::de::Error::custom(format!(
                "unknown cell marker '{}' (expected \"FREE\")",
                m
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_derived_constants() {
        let size = GridSize::Four;
        assert_eq!(size.dimension(), 4);
        assert_eq!(size.cell_count(), 16);
        assert_eq!(size.line_count(), 8);
        assert_eq!(size.corner_indices(), [0, 3, 12, 15]);
    }

    #[test]
    fn test_corner_indices_five() {
        assert_eq!(GridSize::Five.corner_indices(), [0, 4, 20, 24]);
    }

    #[test]
    fn test_parse_grid_size_forms() {
        assert_eq!("3x3".parse::<GridSize>().unwrap(), GridSize::Three);
        assert_eq!("5X5".parse::<GridSize>().unwrap(), GridSize::Five);
        assert_eq!(" 4 ".parse::<GridSize>().unwrap(), GridSize::Four);
    }

    #[test]
    fn test_parse_grid_size_rejects_unsupported() {
        assert!("2x2".parse::<GridSize>().is_err());
        assert!("6".parse::<GridSize>().is_err());
        assert!("3x4".parse::<GridSize>().is_err());
        assert!("big".parse::<GridSize>().is_err());
    }

    #[test]
    fn test_grid_size_display() {
        assert_eq!(GridSize::Three.to_string(), "3x3");
    }

    #[test]
    fn test_grid_size_json_form() {
        let json = serde_json::to_string(&GridSize::Five).unwrap();
        assert_eq!(json, "\"5x5\"");
        let parsed: GridSize = serde_json::from_str("\"4x4\"").unwrap();
        assert_eq!(parsed, GridSize::Four);
    }

    #[test]
    fn test_cell_json_forms() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[7, "FREE", null]"#).unwrap();
        assert_eq!(cells, vec![Cell::Number(7), Cell::Free, Cell::Empty]);
        assert_eq!(serde_json::to_string(&cells).unwrap(), r#"[7,"FREE",null]"#);
    }

    #[test]
    fn test_cell_json_rejects_unknown_marker() {
        assert!(serde_json::from_str::<Cell>(r#""STAR""#).is_err());
        assert!(serde_json::from_str::<Cell>("0").is_err());
    }

    #[test]
    fn test_parse_cells() {
        let cells = parse_cells("1, 2,FREE * _ 9").unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::Number(1),
                Cell::Number(2),
                Cell::Free,
                Cell::Free,
                Cell::Empty,
                Cell::Number(9),
            ]
        );
    }

    #[test]
    fn test_parse_cells_invalid() {
        assert!(parse_cells("1,two,3").is_err());
        assert!(parse_cells("0").is_err());
    }
}
