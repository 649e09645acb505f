pub use rain_utils::dates::DEFAULT_DATE_FORMAT;

/// Which columns of a daily row hold the date and the rainfall amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// A single date column parsed with `InputFormat::date_format`.
    Date { date: usize, amount: usize },
    /// Year, month and day in separate numeric columns.
    SplitDate {
        year: usize,
        month: usize,
        day: usize,
        amount: usize,
    },
}

impl ColumnLayout {
    /// Minimum number of columns a row must have for this layout.
    pub fn required_columns(&self) -> usize {
        let highest = match *self {
            ColumnLayout::Date { date, amount } => date.max(amount),
            ColumnLayout::SplitDate {
                year,
                month,
                day,
                amount,
            } => year.max(month).max(day).max(amount),
        };
        highest + 1
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout::Date { date: 0, amount: 1 }
    }
}

/// Shape of a daily rainfall file for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormat {
    pub delimiter: u8,
    pub has_headers: bool,
    pub date_format: String,
    pub layout: ColumnLayout,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            layout: ColumnLayout::default(),
        }
    }
}

impl InputFormat {
    /// Bureau of Meteorology daily rainfall export:
    /// `Product code,Station number,Year,Month,Day,Rainfall amount (millimetres),Period,Quality`
    pub fn bom() -> Self {
        Self {
            layout: ColumnLayout::SplitDate {
                year: 2,
                month: 3,
                day: 4,
                amount: 5,
            },
            ..Self::default()
        }
    }
}
