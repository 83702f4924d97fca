use crate::config::BackendConfig;
use crate::error::ProxyError;
use crate::models::extraction::unwrap_results;
use crate::models::{ExtractionResponse, MatchResponse};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// 后端列表接口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendList {
    PurchaseOrders,
    Invoices,
    GoodsReceived,
}

impl BackendList {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "purchase-orders" => Some(Self::PurchaseOrders),
            "invoices" => Some(Self::Invoices),
            "goods-received" => Some(Self::GoodsReceived),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::PurchaseOrders => "purchase-orders",
            Self::Invoices => "invoices",
            Self::GoodsReceived => "goods-received",
        }
    }
}

/// 单次请求超时
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub extract: Duration,
    pub extract_and_match: Duration,
    pub list: Duration,
}

impl From<&BackendConfig> for Timeouts {
    fn from(config: &BackendConfig) -> Self {
        Self {
            extract: config.extract_timeout(),
            extract_and_match: config.match_timeout(),
            list: config.list_timeout(),
        }
    }
}

/// 上传表单的一个字段
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// 转发给后端的 multipart 表单
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub parts: Vec<UploadPart>,
}

impl UploadForm {
    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    fn into_multipart(self) -> Result<Form, ProxyError> {
        let mut form = Form::new();
        for upload in self.parts {
            let mut part = Part::bytes(upload.data);
            if let Some(file_name) = upload.file_name {
                part = part.file_name(file_name);
            }
            if let Some(content_type) = upload.content_type {
                part = part
                    .mime_str(&content_type)
                    .map_err(|e| ProxyError::unknown(e.to_string()))?;
            }
            form = form.part(upload.name, part);
        }
        Ok(form)
    }
}

/// 后端成功应答, 状态码原样转发给调用方
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> BackendReply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BackendReply<U> {
        BackendReply {
            status: self.status,
            body: f(self.body),
        }
    }
}

/// 外部提取/匹配后端客户端 (失败不重试)
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    base_url: String,
    timeouts: Timeouts,
}

impl ExtractionClient {
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ProxyError> {
        // 后端为内网服务, 不走系统代理
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeouts,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ProxyError> {
        Self::new(config.url.clone(), Timeouts::from(config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发票提取, 兼容旧响应格式
    pub async fn extract(&self, form: UploadForm) -> Result<BackendReply<ExtractionResponse>, ProxyError> {
        let reply = self
            .post_form("/api/extract-invoice/", form, self.timeouts.extract)
            .await?;
        Ok(reply.map(ExtractionResponse::from_body))
    }

    /// 提取并匹配采购订单, 响应体原样透传 (仅追加指示灯)
    pub async fn extract_and_match(&self, form: UploadForm) -> Result<BackendReply<MatchResponse>, ProxyError> {
        let reply = self
            .post_form("/api/extract-and-match/", form, self.timeouts.extract_and_match)
            .await?;
        Ok(reply.map(|body| MatchResponse::new(body).annotate()))
    }

    /// 列表读取, 分页信封自动解包
    pub async fn list(&self, kind: BackendList) -> Result<Value, ProxyError> {
        let url = format!("{}/api/{}/", self.base_url, kind.slug());
        tracing::info!("Fetching {} from: {}", kind.slug(), url);

        let request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeouts.list);
        let reply = self.send_json(request).await?;
        Ok(unwrap_results(reply.body))
    }

    async fn post_form(
        &self,
        path: &str,
        form: UploadForm,
        timeout: Duration,
    ) -> Result<BackendReply<Value>, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::info!(
            "Forwarding form to {} (fields: {})",
            url,
            form.field_names().join(", ")
        );

        let request = self
            .http
            .post(&url)
            .multipart(form.into_multipart()?)
            .timeout(timeout);
        self.send_json(request).await
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<BackendReply<Value>, ProxyError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Backend response status: {}", status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("Backend returned {}: {}", status, text);
            return Err(ProxyError::unknown(format!(
                "Backend returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let body = response.json::<Value>().await?;
        Ok(BackendReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_slugs_round_trip() {
        for kind in [BackendList::PurchaseOrders, BackendList::Invoices, BackendList::GoodsReceived] {
            assert_eq!(BackendList::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(BackendList::from_slug("vendors"), None);
    }

    #[test]
    fn reply_map_keeps_status() {
        let reply = BackendReply {
            status: StatusCode::CREATED,
            body: 2,
        };
        assert_eq!(
            reply.map(|n| n * 10),
            BackendReply {
                status: StatusCode::CREATED,
                body: 20,
            }
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ExtractionClient::new("http://localhost:8000/", Timeouts::from(&crate::AppConfig::default().backend)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn invalid_content_type_is_rejected() {
        let form = UploadForm {
            parts: vec![UploadPart {
                name: "file".into(),
                file_name: Some("a.pdf".into()),
                content_type: Some("not a mime".into()),
                data: vec![1, 2, 3],
            }],
        };
        let err = form.into_multipart().unwrap_err();
        assert_eq!(err.code(), crate::error::ProxyErrorCode::UnknownError);
    }
}
