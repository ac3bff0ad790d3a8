// ==========================================
// Parking occupancy - export error types
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nenhum dado para exportar")]
    NoData,

    #[error("falha ao escrever arquivo: {0}")]
    FileWriteError(#[from] std::io::Error),

    #[error("falha ao gerar CSV: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("falha ao finalizar CSV: {0}")]
    FlushError(String),
}
