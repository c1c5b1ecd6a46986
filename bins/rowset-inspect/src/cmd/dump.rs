use rowset_api::RowSource;
use rowset_engine::{CursorConfig, Decoded, RowCursor};

use crate::config::DumpArgs;
use crate::error::InspectError;
use crate::payload::ResultPage;

pub fn run(args: DumpArgs) -> Result<(), InspectError> {
    let mut config = match &args.config {
        Some(path) => {
            let config = CursorConfig::load(path)?;
            tracing::info!(config = %path, "loaded config");
            config
        }
        None => CursorConfig::default(),
    };
    if let Some(zone) = args.time_zone {
        config.time_zone = zone;
    }
    let options = config.resolve()?;

    let page = ResultPage::load(&args.input)?;
    tracing::info!(input = %args.input, query_id = %page.id, rows = page.data.len(), "loaded result page");

    let mut cursor = page.into_cursor()?.with_options(options);
    while cursor.advance()? {
        println!("{}", render_row(&mut cursor)?);
    }
    cursor.close();
    Ok(())
}

/// `#<row> name=value name=value ...`
fn render_row<S: RowSource>(cursor: &mut RowCursor<S>) -> Result<String, InspectError> {
    let mut line = format!("#{}", cursor.current_row_number()?);
    for ordinal in 1..=cursor.column_count() {
        let value = cursor.get_decoded(ordinal)?;
        let name = cursor.column_name(ordinal)?;
        if value == Decoded::Null && !cursor.is_nullable(ordinal)? {
            tracing::warn!(column = %name, "NULL in non-nullable column");
        }
        line.push_str(&format!(" {name}={value}"));
    }
    Ok(line)
}
