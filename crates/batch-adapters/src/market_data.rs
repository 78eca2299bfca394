//! Record de market data y su mapeo desde un archivo delimitado de tres
//! columnas con cabecera.

use std::io::BufRead;

use batch_core::transform::{FnStage, TransformResult};
use serde::{Deserialize, Serialize};

use crate::delimited::{DelimitedFileSource, DelimitedSourceBuilder};
use crate::field_set::{FieldSet, FieldSetError, FieldSetMapper};
use crate::logging::logging_stage;

/// Columnas del archivo, en orden.
pub const COLUMNS: [&str; 3] = ["TID", "TickerName", "TickerDescription"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    pub tid: u64,
    pub ticker_name: String,
    pub ticker_description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketDataFieldSetMapper;

impl FieldSetMapper<MarketData> for MarketDataFieldSetMapper {
    fn map_field_set(&self, fields: &FieldSet) -> Result<MarketData, FieldSetError> {
        Ok(MarketData { tid: fields.read_u64(COLUMNS[0])?,
                        ticker_name: fields.read_string(COLUMNS[1])?,
                        ticker_description: fields.read_string(COLUMNS[2])? })
    }
}

/// Reader preconfigurado: cabecera de una línea, columnas `COLUMNS`.
pub fn market_data_source() -> DelimitedSourceBuilder<MarketDataFieldSetMapper> {
    DelimitedSourceBuilder::new().name("marketDataCsvReader")
                                 .names(&COLUMNS)
                                 .lines_to_skip(1)
                                 .mapper(MarketDataFieldSetMapper)
}

pub type MarketDataSource<B> = DelimitedFileSource<MarketData, MarketDataFieldSetMapper, B>;

pub fn market_data_reader<B: BufRead>(reader: B) -> MarketDataSource<B> {
    market_data_source().from_reader(reader)
}

/// Etapa pass-through que loguea cada record con `name`.
pub fn logging_processor(name: &str) -> FnStage<impl Fn(&MarketData) -> TransformResult<MarketData>> {
    logging_stage::<MarketData>(name.to_string())
}
