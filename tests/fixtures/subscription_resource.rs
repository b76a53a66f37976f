// Resource fixture - a subscription API exercising every kind of operation metadata
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
    pub topics: Vec<String>,
}

pub struct RequestContext;

#[path("/")]
#[tags("Example tag")]
pub struct SubscriptionResource;

impl SubscriptionResource {
    #[get]
    #[path("/summary")]
    #[operation(summary = "Operation Summary", description = "Operation Description")]
    pub fn summary(&self) {}

    #[get]
    #[path("/responses")]
    #[api_response(
        status = 200,
        description = "voila!",
        content(media_type = "application/json", schema = Subscription)
    )]
    #[api_response(description = "boo", content(media_type = "*/*"))]
    pub fn responses(&self) -> Subscription {
        todo!()
    }

    #[post]
    #[path("/subscriptions")]
    pub fn create(
        &self,
        #[request_body(
            description = "Request description",
            content(media_type = "application/json")
        )]
        request: SubscriptionRequest,
    ) -> Subscription {
        todo!()
    }

    #[get]
    #[path("/subscriptions/{subscriptionId}")]
    #[external_docs(description = "External documentation description", url = "http://url.com")]
    pub fn find(
        &self,
        #[parameter(
            name = "subscriptionId",
            in = "path",
            description = "parameter description",
            required = false,
            allow_empty_value = true,
            allow_reserved = true,
            deprecated = false
        )]
        id: String,
    ) -> Subscription {
        todo!()
    }

    #[post]
    #[path("/subscribe")]
    #[callback(
        name = "subscription",
        operation(
            method = "post",
            description = "payload data will be sent",
            parameter(
                name = "subscriptionId",
                in = "path",
                description = "parameter description",
                required = false,
                allow_empty_value = true,
                allow_reserved = true
            )
        )
    )]
    pub fn subscribe(&self, #[context] ctx: RequestContext) {}

    #[deprecated]
    #[delete]
    #[path("/subscriptions/{subscriptionId}")]
    pub fn cancel(&self, #[path_param("subscriptionId")] id: String) {}

    pub fn not_an_operation(&self) -> bool {
        true
    }
}
