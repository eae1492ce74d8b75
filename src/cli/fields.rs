use super::ui;
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::Cell;

/// Renders the field catalogue of one category, or every category.
pub fn render(config: &AppConfig, category: Option<&str>) -> Result<String> {
    let categories: Vec<&str> = match category {
        Some(c) => vec![c],
        None => config.fields.categories().collect(),
    };

    let mut output = String::new();
    for category in categories {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Field"),
            ui::header_cell("Predictive"),
            ui::header_cell("Output name"),
        ]);

        for field in config.fields.descriptors(category)? {
            let output_name = if field.predictive {
                Cell::new(config.rename.output_name(category, &field.name))
            } else {
                Cell::new(ui::style_text("-", ui::StyleType::Subtle))
            };
            table.add_row(vec![
                Cell::new(&field.name),
                ui::flag_cell(field.predictive),
                output_name,
            ]);
        }

        output.push_str(&format!(
            "Category: {}\n\n{}\n",
            ui::style_text(category, ui::StyleType::Title),
            table
        ));
    }

    Ok(output)
}

pub fn run(config: &AppConfig, category: Option<&str>) -> Result<()> {
    print!("{}", render(config, category)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_catalog() -> Result<()> {
        let output = render(&AppConfig::default(), Some("EXR"))?;
        assert!(output.contains("EXR"));
        assert!(output.contains("OBS_VALUE"));
        assert!(output.contains("EXCHANGE_RATE"));
        assert!(output.contains("UNIT_MULT"));
        Ok(())
    }

    #[test]
    fn test_render_unknown_category_fails() {
        let result = render(&AppConfig::default(), Some("IRS"));
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unknown field category: IRS"
        );
    }
}
