use anyhow::Context;
use pathex_fields::FieldTable;

/// Strategy for listing the standard field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldsStrategy;

impl super::CommandStrategy for FieldsStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let table = FieldTable::standard().context("Failed to build field table")?;

        println!("{:<40} {:>8}  DEFAULT", "FIELD", "PATTERNS");
        for field in &*table {
            println!(
                "{:<40} {:>8}  {}",
                field.name(),
                field.patterns().len(),
                field.default_value()
            );
        }
        println!();
        println!("{} fields", table.len());

        Ok(())
    }
}
