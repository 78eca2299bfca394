//! batch-adapters: implementaciones concretas de los contratos de
//! batch-core.
//!
//! - `tokenizer` / `field_set`: línea delimitada -> `FieldSet` -> record.
//! - `delimited`: `RecordSource` sobre archivos de texto delimitados.
//! - `logging`: sink y etapa que sólo registran en el log.
//! - `market_data`: el record `MarketData` y su reader preconfigurado.
pub mod delimited;
pub mod field_set;
pub mod logging;
pub mod market_data;
pub mod tokenizer;

pub use delimited::{DelimitedFileSource, DelimitedSourceBuilder};
pub use field_set::{FieldSet, FieldSetError, FieldSetMapper};
pub use logging::{logging_stage, LoggingSink};
pub use market_data::{logging_processor, market_data_reader, market_data_source, MarketData,
                      MarketDataFieldSetMapper, MarketDataSource, COLUMNS};
pub use tokenizer::DelimitedLineTokenizer;
