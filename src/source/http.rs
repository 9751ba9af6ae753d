//! Order source backed by the authenticated order-detail pages.

use super::extract::extract_states;
use super::flatten::flatten_order;
use super::{CredentialProvider, OrderSource, SourceError};
use crate::model::{external_order_id, LineItem};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::COOKIE;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const ORDER_DETAILS_PATH: &str = "/my/orderdetails/";
const ORDER_LIST_PATH: &str = "/my/orderlist?selectedTab=archive";

/// Connection settings for [`HttpOrderSource`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

pub struct HttpOrderSource {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpOrderSource {
    pub fn new(
        config: SourceConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            credentials,
        })
    }

    /// Detail page for one order, e.g. `.../my/orderdetails/?order=1234567-0007`.
    pub fn order_url(&self, owner_id: &str, order_number: u64) -> Result<Url, SourceError> {
        let mut url = self.join(ORDER_DETAILS_PATH)?;
        url.query_pairs_mut()
            .append_pair("order", &external_order_id(owner_id, order_number));
        Ok(url)
    }

    /// GET a page of the source with the session cookie attached.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<String, SourceError> {
        if !self.is_source_url(url) {
            return Err(SourceError::ForeignHost(url.to_string()));
        }
        let cookie = self
            .credentials
            .cookie_header()
            .ok_or(SourceError::MissingCredentials)?;

        let response = self
            .client
            .get(url.clone())
            .header(COOKIE, cookie.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// All embedded states of a page.
    pub async fn fetch_states(&self, url: &Url) -> Result<Vec<Map<String, Value>>, SourceError> {
        let html = self.fetch_page(url).await?;
        Ok(extract_states(&html))
    }

    /// Owner id of the signed-in account, read off the first archived order.
    ///
    /// `Ok(None)` when the account has no archived orders to read it from.
    #[instrument(skip(self))]
    pub async fn current_owner_id(&self) -> Result<Option<String>, SourceError> {
        let url = self.join(ORDER_LIST_PATH)?;
        let states = self.fetch_states(&url).await?;
        let owner = owner_from_order_list(&states);
        if owner.is_none() {
            warn!("No numbered order found in the order list");
        }
        Ok(owner)
    }

    fn join(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::InvalidUrl(path.to_string(), e))
    }

    /// Same host as the base URL, or a subdomain of it.
    fn is_source_url(&self, url: &Url) -> bool {
        let (Some(host), Some(base)) = (url.host_str(), self.base_url.host_str()) else {
            return false;
        };
        let domain = base.strip_prefix("www.").unwrap_or(base);
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

#[async_trait]
impl OrderSource for HttpOrderSource {
    #[instrument(skip(self))]
    async fn get_order(&self, owner_id: &str, order_number: u64) -> Result<Vec<LineItem>, SourceError> {
        let url = self.order_url(owner_id, order_number)?;
        let states = self.fetch_states(&url).await?;
        let items = flatten_order(owner_id, order_number, &states, Utc::now());
        debug!(
            order = %external_order_id(owner_id, order_number),
            items = items.len(),
            "Fetched order"
        );
        Ok(items)
    }

    async fn preflight(&self) -> Result<(), SourceError> {
        self.credentials
            .cookie_header()
            .map(|_| ())
            .ok_or(SourceError::MissingCredentials)
    }
}

/// Owner prefix of the first `orderList[].header.number` (`"1234567-987-654"` -> `"1234567"`).
fn owner_from_order_list(states: &[Map<String, Value>]) -> Option<String> {
    let number = states
        .iter()
        .filter_map(|state| state.get("orderList").and_then(Value::as_array))
        .flatten()
        .find_map(|order| {
            order
                .pointer("/header/number")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
        })?;

    let prefix = number.split('-').next()?.trim();
    let digits: String = prefix.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!(number, "Could not read owner id from order number");
            None
        }
        Ok(owner) => Some(owner.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticCookies;
    use secrecy::SecretString;
    use serde_json::json;

    fn source(cookie: Option<&str>) -> HttpOrderSource {
        let config = SourceConfig {
            base_url: Url::parse("https://www.ozon.ru").unwrap(),
            user_agent: "test".into(),
            timeout: Duration::from_secs(1),
        };
        let cookies = StaticCookies::new(cookie.map(|c| SecretString::from(c.to_string())));
        HttpOrderSource::new(config, Arc::new(cookies)).unwrap()
    }

    fn state(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("state must be an object"),
        }
    }

    #[test]
    fn test_order_url_uses_padded_external_id() {
        let url = source(None).order_url("1234567", 7).unwrap();
        assert_eq!(url.as_str(), "https://www.ozon.ru/my/orderdetails/?order=1234567-0007");
    }

    #[test]
    fn test_source_url_matching() {
        let source = source(None);
        assert!(source.is_source_url(&Url::parse("https://www.ozon.ru/x").unwrap()));
        assert!(source.is_source_url(&Url::parse("https://ozon.ru/x").unwrap()));
        assert!(source.is_source_url(&Url::parse("https://api.ozon.ru/x").unwrap()));
        assert!(!source.is_source_url(&Url::parse("https://notozon.ru/x").unwrap()));
        assert!(!source.is_source_url(&Url::parse("https://example.com/x").unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_before_network() {
        let with_cookie = source(Some("session=1"));
        let foreign = Url::parse("https://example.com/").unwrap();
        assert!(matches!(
            with_cookie.fetch_page(&foreign).await,
            Err(SourceError::ForeignHost(_))
        ));

        let without_cookie = source(None);
        let url = without_cookie.order_url("42", 1).unwrap();
        assert!(matches!(
            without_cookie.fetch_page(&url).await,
            Err(SourceError::MissingCredentials)
        ));
        assert!(matches!(
            without_cookie.get_order("42", 1).await,
            Err(SourceError::MissingCredentials)
        ));
        assert!(matches!(
            without_cookie.preflight().await,
            Err(SourceError::MissingCredentials)
        ));
        assert!(with_cookie.preflight().await.is_ok());
    }

    /// Encode a state the way the page embeds it in a double-quoted attribute.
    fn data_state(value: Value) -> String {
        let encoded = value.to_string().replace('&', "&amp;").replace('"', "&quot;");
        format!(r#"<div class="widget" data-state="{encoded}"></div>"#)
    }

    fn shipment(id: &str, products: Value) -> Value {
        json!({
            "shipmentId": id,
            "items": [ { "sellers": [ { "name": { "text": "Acme & Co" }, "products": products } ] } ]
        })
    }

    fn kettle() -> Value {
        json!({
            "title": {
                "name": { "text": "Kettle \"Steel\"" },
                "common": { "action": { "id": "111", "link": "/product/kettle-111/" } }
            },
            "picture": { "image": { "image": "https://cdn.example/kettle.jpg" } },
            "price": { "price": [ { "text": "1 299 ₽" } ] }
        })
    }

    #[test]
    fn test_order_page_flattens_to_line_items() {
        let html = format!(
            "<html><head><title>Order</title></head><body>\n{}\n{}\n{}\n</body></html>",
            data_state(json!({ "header": { "number": "1234567-0007" }, "status": "delivered" })),
            data_state(shipment(
                "s-1",
                json!([
                    kettle(),
                    {
                        "title": {
                            "name": { "text": "Cup" },
                            "common": { "action": { "id": 222, "link": "/product/cup-222/" } }
                        },
                        "price": { "price": [ { "text": "99 ₽" } ] }
                    }
                ]),
            )),
            data_state(shipment(
                "s-2",
                json!([ kettle(), { "title": { "common": { "action": { "id": "333" } } } } ]),
            )),
        );

        let states = extract_states(&html);
        assert_eq!(states.len(), 3);

        let items = flatten_order("1234567", 7, &states, Utc::now());
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.owner_id == "1234567" && i.order_number == "0007"));

        let first = &items[0];
        assert_eq!(first.product_sku, "111");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.product_name, "Kettle \"Steel\"");
        assert_eq!(first.seller_name, "Acme & Co");
        assert_eq!(first.product_price, "1 299 ₽");
        assert_eq!(first.product_link, "/product/kettle-111/");
        assert_eq!(first.product_image, "https://cdn.example/kettle.jpg");

        assert_eq!(items[1].product_sku, "222");
        assert_eq!(items[1].quantity, 1);
        assert_eq!(items[1].product_image, "");

        assert_eq!(items[2].product_sku, "333");
        assert_eq!(items[2].product_name, "Unknown");
        assert_eq!(items[2].product_price, "0 ₽");
    }

    #[test]
    fn test_order_list_page_yields_owner() {
        let html = format!(
            "<body>{}{}<div data-state=\"\"></div></body>",
            data_state(json!({ "tabs": [ "active", "archive" ] })),
            data_state(json!({
                "orderList": [
                    { "header": { "number": "1234567-0012-1", "date": "3 March" } },
                    { "header": { "number": "1234567-0011" } }
                ]
            })),
        );
        assert_eq!(owner_from_order_list(&extract_states(&html)).as_deref(), Some("1234567"));

        let empty = data_state(json!({ "orderList": [] }));
        assert_eq!(owner_from_order_list(&extract_states(&empty)), None);
    }

    #[test]
    fn test_owner_from_order_list() {
        let states = vec![
            state(json!({ "orderList": [] })),
            state(json!({ "orderList": [ { "header": {} }, { "header": { "number": "1234567-987-654" } } ] })),
        ];
        assert_eq!(owner_from_order_list(&states).as_deref(), Some("1234567"));

        assert_eq!(owner_from_order_list(&[]), None);
        let bad = vec![state(json!({ "orderList": [ { "header": { "number": "abc-1" } } ] }))];
        assert_eq!(owner_from_order_list(&bad), None);
    }
}
