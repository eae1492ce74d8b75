//! Column-named string table used while reshaping feed responses

use csv::StringRecord;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    /// Parses delimited text with a header row.
    pub fn from_csv(text: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let columns = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Frame { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Projects onto `names` in the given order; returns the first missing
    /// column name as the error.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame, String> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n.as_ref()).ok_or_else(|| n.as_ref().to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Frame {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    pub fn push_constant_column(&mut self, name: &str, value: &str) {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.to_string());
        }
    }

    pub fn rename(&mut self, mapping: &BTreeMap<String, String>) {
        for column in &mut self.columns {
            if let Some(new_name) = mapping.get(column) {
                *column = new_name.clone();
            }
        }
    }

    /// Deserializes every row by column name. Columns the target type does
    /// not name are ignored.
    pub fn deserialize_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>, csv::Error> {
        let headers = StringRecord::from(self.columns.as_slice());
        self.rows
            .iter()
            .map(|row| {
                let record = StringRecord::from(row.as_slice());
                record.deserialize(Some(&headers))
            })
            .collect()
    }
}
