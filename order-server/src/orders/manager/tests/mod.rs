use super::*;
use crate::catalog::InMemoryCatalog;
use crate::message::SubscriptionScope;
use crate::utils::ManualClock;
use rust_decimal::Decimal;
use shared::client::OrderItemRequest;
use shared::models::{MenuItem, StaffRole, TenantSettings};
use std::str::FromStr;
use std::time::Duration;

const START: i64 = 1_700_000_000_000;

struct Harness {
    manager: Arc<OrdersManager>,
    directory: Arc<TenantDirectory>,
    storage: Storage,
    bus: MessageBus,
    clock: Arc<ManualClock>,
    tenant: Tenant,
    table: Table,
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn create_harness(settings: TenantSettings) -> Harness {
    let storage = Storage::open_in_memory().unwrap();
    let clock = Arc::new(ManualClock::new(START));
    let directory = Arc::new(TenantDirectory::new(storage.clone(), clock.clone()).unwrap());
    let tenant = directory
        .register_tenant("trattoria", "Trattoria", settings)
        .unwrap();
    let table = directory.add_table(&tenant.id, 5).unwrap();

    let catalog = InMemoryCatalog::new();
    for (id, name, price) in [("pizza", "Pizza", "100"), ("steak", "Steak", "150")] {
        catalog.upsert(MenuItem {
            id: id.to_string(),
            tenant_id: tenant.id.clone(),
            name: name.to_string(),
            price: dec(price),
            available: true,
            customizations: vec![],
        });
    }

    let bus = MessageBus::new();
    let manager = Arc::new(OrdersManager::new(
        storage.clone(),
        directory.clone(),
        Arc::new(catalog),
        bus.clone(),
        clock.clone(),
        EngineConfig::default(),
    ));
    Harness {
        manager,
        directory,
        storage,
        bus,
        clock,
        tenant,
        table,
    }
}

fn ten_percent_tax() -> TenantSettings {
    TenantSettings {
        tax_rate: dec("0.10"),
        ..Default::default()
    }
}

impl Harness {
    fn guest(&self) -> AccessContext {
        self.guest_session("ses_a")
    }

    fn guest_session(&self, session_id: &str) -> AccessContext {
        AccessContext::guest(&self.tenant.id, &self.table.id, session_id)
    }

    fn staff(&self, role: StaffRole) -> AccessContext {
        AccessContext::staff(&self.tenant.id, "stf_1", role, &[])
    }

    fn place_order(&self) -> Order {
        self.manager
            .create_order(&self.guest(), &pizza_and_steak())
            .unwrap()
    }

    fn advance(&self, order: &Order, target: OrderStatus) -> Order {
        self.manager
            .transition_status(&self.staff(StaffRole::Owner), &order.id, target, None)
            .unwrap()
    }

    fn table_now(&self) -> Table {
        self.storage.get_table(&self.table.id).unwrap().unwrap()
    }
}

fn item(id: &str, quantity: u32) -> OrderItemRequest {
    OrderItemRequest {
        menu_item_id: id.to_string(),
        quantity,
        customizations: vec![],
    }
}

fn pizza_and_steak() -> CreateOrderRequest {
    CreateOrderRequest {
        table_id: None,
        items: vec![item("pizza", 1), item("steak", 1)],
        special_instructions: Some("no onions".to_string()),
    }
}

mod test_core;
