use crate::error::LoadError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 三类 CSV 数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    PurchaseOrders,
    Invoices,
    GoodsReceived,
}

impl RecordSource {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::PurchaseOrders => "purchase-orders.csv",
            Self::Invoices => "invoices.csv",
            Self::GoodsReceived => "goods-received.csv",
        }
    }
}

/// CSV 解析参数
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub quote: u8,
    pub has_headers: bool,
    pub trim: bool,
    /// 容忍列数不一致的行
    pub flexible: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            has_headers: true,
            trim: true,
            flexible: true,
        }
    }
}

impl LoadOptions {
    fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(true)
            .escape(None)
            .has_headers(self.has_headers)
            .flexible(self.flexible)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None });
        builder
    }
}

/// 从任意 reader 读取全部行, 保持文件顺序
///
/// 行的列数与表头不一致时按表头补齐/截断; 全空行跳过。
/// 任一行格式错误则整个数据源失败。
pub fn read_records<T, R>(reader: R, options: &LoadOptions, origin: &str) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let malformed = |source: csv::Error| LoadError::Malformed {
        origin: origin.to_string(),
        source,
    };

    let mut reader = options.reader_builder().from_reader(reader);
    let headers = if options.has_headers {
        Some(reader.headers().map_err(malformed)?.clone())
    } else {
        None
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record.map_err(malformed)?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        if let Some(headers) = &headers {
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.truncate(headers.len());
        }

        rows.push(record.deserialize(headers.as_ref()).map_err(malformed)?);
    }

    Ok(rows)
}

/// 数据源加载器: 每次调用都重新打开文件 (只读)
#[derive(Debug, Clone)]
pub struct RecordLoader {
    root: PathBuf,
    options: LoadOptions,
}

impl RecordLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path_of(&self, source: RecordSource) -> PathBuf {
        self.root.join(source.file_name())
    }

    pub fn load<T: DeserializeOwned>(&self, source: RecordSource) -> Result<Vec<T>, LoadError> {
        self.load_file(&self.path_of(source))
    }

    pub fn load_file<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::from_io(path.to_path_buf(), e))?;
        let rows = read_records(file, &self.options, &path.display().to_string())?;
        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}
