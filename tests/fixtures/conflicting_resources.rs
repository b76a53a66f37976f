// Resource fixture - structural mistakes that must be reported, not merged away
pub struct Order {
    pub id: u64,
}

#[path("/orders")]
pub struct OrderResource;

impl OrderResource {
    #[get]
    pub fn list(&self) -> Vec<Order> {
        vec![]
    }

    #[get]
    #[path("/")]
    pub fn list_again(&self) -> Vec<Order> {
        vec![]
    }

    #[get]
    #[path("/{id}")]
    #[api_response(status = 200)]
    pub fn missing_description(&self, #[path_param] id: u64) {}

    #[get]
    #[path("/{id}/items/{id}")]
    pub fn malformed(&self, #[path_param] id: u64) {}

    #[post]
    pub fn create(&self, #[parameter(in = "query")] nameless: String) {}

    #[delete]
    #[path("/{orderId}")]
    pub fn cancel(&self, #[path_param] order_id: u64) {}
}

#[path("/orders")]
pub struct LegacyOrderResource;

impl LegacyOrderResource {
    #[delete]
    #[path("/{orderId}")]
    pub fn cancel(&self, #[path_param("orderId")] id: u64) {}
}
