use crate::domain::model::ExamResult;
use crate::utils::error::Result;
use async_trait::async_trait;

/// File access relative to a storage root.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// File names directly under the root with the given extension, sorted.
    fn list_files(
        &self,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn root_exists(&self) -> impl std::future::Future<Output = bool> + Send;
    fn create_root(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn describe(&self) -> String;
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record(&self, result: &ExamResult) -> Result<()>;
    fn is_enabled(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: ResultSink + ?Sized> ResultSink for Box<T> {
    async fn record(&self, result: &ExamResult) -> Result<()> {
        (**self).record(result).await
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
