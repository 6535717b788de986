use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Corpus contains no surahs")]
    EmptyCorpus,
    #[error("Surah {0} not found in corpus")]
    SurahNotFound(u32),
    #[error("Page map declares zero pages")]
    EmptyPageMap,
    #[error("Page {page} out of range 1..={total}")]
    PageOutOfRange { page: u32, total: u32 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
