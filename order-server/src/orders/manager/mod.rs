//! OrdersManager - order lifecycle engine
//!
//! Owns order creation, status transitions, payment results and staff
//! annotations. Every mutation is one redb write transaction; committed
//! changes are then published to the [`MessageBus`].
//!
//! # Mutation Flow
//!
//! ```text
//! transition_status(ctx, order_id, target)
//!     ├─ 1. Load order (read transaction) + tenant check
//!     ├─ 2. Check edge in the transition table + capability
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Compare-and-swap on order.version (StaleOrder on mismatch)
//!     ├─ 5. Persist order + timeline entry (+ free table when terminal)
//!     ├─ 6. Commit
//!     ├─ 7. Publish event(s)
//!     └─ on StaleOrder: reload once and retry from 1
//! ```

use std::sync::Arc;

use shared::client::{CreateOrderRequest, PaymentCallback};
use shared::models::{Table, TableStatus, Tenant};
use shared::order::{
    ActorRef, DomainEvent, EventPayload, Order, OrderStatus, PaymentResult, PaymentStatus,
    StaffNote, TimelineEntry,
};
use shared::util::prefixed_id;

use super::error::{OrderError, OrderResult};
use super::{policy, pricing};
use crate::auth::capability::{
    ORDER_ANNOTATE, ORDER_CANCEL, ORDER_CONFIRM, ORDER_CREATE, ORDER_READ, ORDER_READ_OWN_TABLE,
    TABLE_UPDATE,
};
use crate::auth::{AccessContext, AuthError};
use crate::catalog::MenuCatalog;
use crate::db::{Storage, StorageError};
use crate::directory::TenantDirectory;
use crate::message::MessageBus;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::Clock;

/// Engine tunables
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a diner may cancel their own pending order (milliseconds)
    pub guest_cancel_grace_ms: i64,
    pub prep_base_minutes: u32,
    pub prep_cap_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            guest_cancel_grace_ms: 120_000,
            prep_base_minutes: 10,
            prep_cap_minutes: 60,
        }
    }
}

/// Result of a committed order change
struct Committed {
    order: Order,
    /// Table released by a terminal transition
    freed_table: Option<Table>,
}

/// Order lifecycle engine
pub struct OrdersManager {
    storage: Storage,
    directory: Arc<TenantDirectory>,
    catalog: Arc<dyn MenuCatalog>,
    bus: MessageBus,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<Storage>")
            .field("config", &self.config)
            .finish()
    }
}

impl OrdersManager {
    pub fn new(
        storage: Storage,
        directory: Arc<TenantDirectory>,
        catalog: Arc<dyn MenuCatalog>,
        bus: MessageBus,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            storage,
            directory,
            catalog,
            bus,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create an order for a table
    ///
    /// Lines are priced from the catalog, never from client input. The
    /// occupancy check, the capacity check, the order insert and the table
    /// update share one write transaction: either all of them happen or none.
    pub fn create_order(&self, ctx: &AccessContext, req: &CreateOrderRequest) -> OrderResult<Order> {
        ctx.require(ORDER_CREATE)?;
        let table_id = self.target_table(ctx, req.table_id.as_deref())?;
        validate_optional_text(
            req.special_instructions.as_deref(),
            "special_instructions",
            MAX_NOTE_LEN,
        )
        .map_err(|e| OrderError::Validation(e.message))?;

        let tenant = self.active_tenant(ctx.tenant_id())?;
        let table = self
            .directory
            .find_table(&table_id)?
            .ok_or_else(|| OrderError::TableNotFound(table_id.clone()))?;
        ctx.ensure_tenant(&table.tenant_id, "table")?;

        let lines = pricing::price_lines(self.catalog.as_ref(), &tenant.id, &req.items)?;
        let totals = pricing::compute_totals(&lines, &tenant.settings);
        let item_count: u32 = lines.iter().map(|l| l.quantity).sum();

        let now = self.clock.now_millis();
        let order = Order {
            id: prefixed_id("ord"),
            tenant_id: tenant.id.clone(),
            table_id: table.id.clone(),
            session_id: ctx.session_id().map(str::to_string),
            lines,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            service_charge: totals.service_charge,
            total: totals.total,
            tax_rate: tenant.settings.tax_rate,
            service_charge_rate: tenant.settings.service_charge_rate,
            currency: tenant.settings.currency.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_instructions: req
                .special_instructions
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            estimated_prep_minutes: pricing::estimate_prep_minutes(
                item_count,
                self.config.prep_base_minutes,
                self.config.prep_cap_minutes,
            ),
            notes: vec![],
            cancel_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let txn = self.storage.begin_write()?;
        if let Some(active) = self
            .storage
            .active_order_for_table_txn(&txn, &tenant.id, &table.id)?
        {
            tracing::info!(
                tenant_id = %tenant.id,
                table_id = %table.id,
                active_order = %active,
                "Order rejected, table occupied"
            );
            return Err(OrderError::TableOccupied {
                table_id: table.id,
                order_id: active,
            });
        }
        if let Some(limit) = tenant.settings.max_concurrent_orders {
            let active = self.storage.count_active_orders_txn(&txn, &tenant.id)?;
            if active >= limit as usize {
                return Err(OrderError::TenantAtCapacity { limit });
            }
        }

        let mut seated = self
            .storage
            .get_table_txn(&txn, &table.id)?
            .ok_or_else(|| OrderError::TableNotFound(table.id.clone()))?;
        seated.status = TableStatus::Occupied;
        seated.current_order_id = Some(order.id.clone());
        seated.version += 1;

        self.storage.put_order_txn(&txn, &order)?;
        self.storage.append_timeline_txn(
            &txn,
            &TimelineEntry {
                order_id: order.id.clone(),
                version: order.version,
                from: None,
                to: OrderStatus::Pending,
                actor: ctx.actor_ref(),
                reason: None,
                timestamp: now,
            },
        )?;
        self.storage
            .set_active_order_txn(&txn, &tenant.id, &table.id, &order.id)?;
        self.storage.put_table_txn(&txn, &seated)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            tenant_id = %order.tenant_id,
            table_id = %order.table_id,
            order_id = %order.id,
            total = %order.total,
            items = item_count,
            actor = %ctx.actor_ref(),
            "Order created"
        );

        self.bus.publish(self.order_event(
            &order,
            EventPayload::OrderCreated {
                order: Box::new(order.clone()),
            },
        ));
        self.bus.publish(self.table_event(&seated));
        Ok(order)
    }

    /// Table an order is placed for: guests order for their own table only
    fn target_table(&self, ctx: &AccessContext, requested: Option<&str>) -> OrderResult<String> {
        match (ctx.table_id(), requested) {
            (Some(own), None) => Ok(own.to_string()),
            (Some(own), Some(requested)) if own == requested => Ok(own.to_string()),
            (Some(_), Some(_)) => Err(AuthError::Denied {
                actor: ctx.actor_ref().to_string(),
                capability: ORDER_CREATE.to_string(),
            }
            .into()),
            (None, Some(requested)) => Ok(requested.to_string()),
            (None, None) => Err(OrderError::Validation("table_id is required".to_string())),
        }
    }

    fn active_tenant(&self, tenant_id: &str) -> OrderResult<Tenant> {
        let tenant = self
            .directory
            .get(tenant_id)?
            .ok_or_else(|| OrderError::TenantNotFound(tenant_id.to_string()))?;
        if !tenant.active {
            return Err(OrderError::TenantInactive(tenant_id.to_string()));
        }
        Ok(tenant)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Move an order along the transition table
    ///
    /// `expected_version` is the version the caller last saw; a mismatch is a
    /// conflict. A concurrent write detected at commit is retried once
    /// against fresh state; if the fresh state already made the requested
    /// move pointless, the conflict is returned instead.
    pub fn transition_status(
        &self,
        ctx: &AccessContext,
        order_id: &str,
        target: OrderStatus,
        expected_version: Option<u64>,
    ) -> OrderResult<Order> {
        if target == OrderStatus::Cancelled {
            return self.cancel_with(ctx, order_id, None, expected_version);
        }
        self.with_conflict_retry(order_id, |retrying, conflict| {
            let order = self.load_for_update(ctx, order_id, expected_version)?;
            if retrying && !policy::is_allowed(order.status, target) {
                return Err(conflict.unwrap_or_else(|| stale(&order, order.version)));
            }
            self.check_transition(ctx, &order, target)?;

            let committed = self.commit_change(&order, ctx.actor_ref(), None, |o| {
                o.status = target;
            })?;
            self.publish_status_change(&order, &committed, ctx.actor_ref(), None);
            Ok(committed.order)
        })
    }

    /// Cancel an order, recording `reason`
    ///
    /// Staff need `order:cancel`. The diner session that created a pending
    /// order may cancel it within the grace window.
    pub fn cancel_order(
        &self,
        ctx: &AccessContext,
        order_id: &str,
        reason: Option<&str>,
    ) -> OrderResult<Order> {
        self.cancel_with(ctx, order_id, reason, None)
    }

    fn cancel_with(
        &self,
        ctx: &AccessContext,
        order_id: &str,
        reason: Option<&str>,
        expected_version: Option<u64>,
    ) -> OrderResult<Order> {
        validate_optional_text(reason, "reason", MAX_NOTE_LEN)
            .map_err(|e| OrderError::Validation(e.message))?;
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        self.with_conflict_retry(order_id, |retrying, conflict| {
            let order = self.load_for_update(ctx, order_id, expected_version)?;
            if retrying && order.status.is_terminal() {
                return Err(conflict.unwrap_or_else(|| stale(&order, order.version)));
            }
            if order.status.is_terminal() {
                return Err(OrderError::AlreadyTerminal {
                    order_id: order.id.clone(),
                    status: order.status,
                });
            }
            if ctx.is_anonymous() {
                self.check_guest_cancel(ctx, &order)?;
            } else {
                ctx.require(ORDER_CANCEL)?;
            }

            let committed = self.commit_change(&order, ctx.actor_ref(), reason.clone(), |o| {
                o.status = OrderStatus::Cancelled;
                o.cancel_reason = reason.clone();
            })?;
            self.publish_status_change(&order, &committed, ctx.actor_ref(), reason.clone());
            tracing::info!(
                order_id = %order.id,
                actor = %ctx.actor_ref(),
                reason = reason.as_deref().unwrap_or(""),
                "Order cancelled"
            );
            Ok(committed.order)
        })
    }

    fn check_guest_cancel(&self, ctx: &AccessContext, order: &Order) -> OrderResult<()> {
        let own_session = ctx.table_id() == Some(order.table_id.as_str())
            && order.session_id.is_some()
            && ctx.session_id() == order.session_id.as_deref();
        if !own_session {
            return Err(AuthError::Denied {
                actor: ctx.actor_ref().to_string(),
                capability: ORDER_CANCEL.to_string(),
            }
            .into());
        }
        let elapsed = self.clock.now_millis() - order.created_at;
        if order.status != OrderStatus::Pending || elapsed > self.config.guest_cancel_grace_ms {
            tracing::info!(
                order_id = %order.id,
                status = %order.status,
                elapsed_ms = elapsed,
                "Guest cancellation refused"
            );
            return Err(OrderError::CancelWindowExpired(order.id.clone()));
        }
        Ok(())
    }

    fn check_transition(
        &self,
        ctx: &AccessContext,
        order: &Order,
        target: OrderStatus,
    ) -> OrderResult<()> {
        if order.status.is_terminal() {
            return Err(OrderError::AlreadyTerminal {
                order_id: order.id.clone(),
                status: order.status,
            });
        }
        let rule = policy::rule(order.status, target).ok_or(OrderError::InvalidTransition {
            from: order.status,
            to: target,
        })?;
        ctx.require(rule.capability)?;

        if target == OrderStatus::Confirmed && order.payment_status != PaymentStatus::Completed {
            let tenant = self.active_tenant(&order.tenant_id)?;
            if !tenant.settings.allow_pay_later {
                return Err(OrderError::PaymentRequired(order.id.clone()));
            }
        }
        Ok(())
    }

    /// Run `op`, and run it once more after a version conflict
    ///
    /// `op` receives whether this is the retry and the conflict that caused it.
    fn with_conflict_retry<T>(
        &self,
        order_id: &str,
        mut op: impl FnMut(bool, Option<OrderError>) -> OrderResult<T>,
    ) -> OrderResult<T> {
        match op(false, None) {
            Err(conflict @ OrderError::StaleOrder { .. }) => {
                tracing::debug!(order_id, error = %conflict, "Version conflict, retrying once");
                op(true, Some(conflict))
            }
            other => other,
        }
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// Apply a payment gateway callback
    ///
    /// Success with the exact order total marks the payment completed and
    /// confirms a pending order in the same write. A callback for a
    /// cancelled order is a conflict: it never revives the order.
    pub fn apply_payment_result(&self, callback: &PaymentCallback) -> OrderResult<Order> {
        self.with_conflict_retry(&callback.order_id, |_, _| {
            let order = self
                .storage
                .get_order(&callback.order_id)?
                .ok_or_else(|| OrderError::OrderNotFound(callback.order_id.clone()))?;
            let ctx = AccessContext::payment_gateway(order.tenant_id.clone());

            if order.status == OrderStatus::Cancelled {
                tracing::warn!(order_id = %order.id, "Payment callback for cancelled order");
                return Err(OrderError::PaymentOnCancelled(order.id.clone()));
            }

            match callback.result {
                PaymentResult::Success => {
                    if callback.amount != order.total {
                        return Err(OrderError::PaymentAmountMismatch {
                            expected: order.total,
                            received: callback.amount,
                        });
                    }
                    if order.payment_status == PaymentStatus::Completed {
                        // Gateways redeliver callbacks
                        return Ok(order);
                    }
                    let confirm = order.status == OrderStatus::Pending;
                    if confirm {
                        ctx.require(ORDER_CONFIRM)?;
                    }
                    let reason = confirm.then(|| "payment completed".to_string());
                    let committed = self.commit_change(&order, ctx.actor_ref(), reason, |o| {
                        o.payment_status = PaymentStatus::Completed;
                        if confirm {
                            o.status = OrderStatus::Confirmed;
                        }
                    })?;
                    self.publish_payment(&committed.order);
                    tracing::info!(order_id = %order.id, confirmed = confirm, "Payment completed");
                    Ok(committed.order)
                }
                PaymentResult::Failure => {
                    if order.payment_status == PaymentStatus::Completed {
                        tracing::warn!(order_id = %order.id, "Payment failure after success ignored");
                        return Ok(order);
                    }
                    if order.payment_status == PaymentStatus::Failed {
                        return Ok(order);
                    }
                    let committed = self.commit_change(&order, ctx.actor_ref(), None, |o| {
                        o.payment_status = PaymentStatus::Failed;
                    })?;
                    self.publish_payment(&committed.order);
                    tracing::info!(order_id = %order.id, "Payment failed");
                    Ok(committed.order)
                }
            }
        })
    }

    // ========================================================================
    // Annotations and tables
    // ========================================================================

    /// Append a staff note (the only change allowed besides status/payment)
    pub fn annotate(&self, ctx: &AccessContext, order_id: &str, note: &str) -> OrderResult<Order> {
        ctx.require(ORDER_ANNOTATE)?;
        validate_required_text(note, "note", MAX_NOTE_LEN)
            .map_err(|e| OrderError::Validation(e.message))?;
        let staff_id = ctx.staff_id().unwrap_or_default().to_string();
        let note = note.trim().to_string();

        self.with_conflict_retry(order_id, |_, _| {
            let order = self.load_for_update(ctx, order_id, None)?;
            let now = self.clock.now_millis();
            let committed = self.commit_change(&order, ctx.actor_ref(), None, |o| {
                o.notes.push(StaffNote {
                    staff_id: staff_id.clone(),
                    note: note.clone(),
                    created_at: now,
                });
            })?;
            self.bus.publish(self.order_event(
                &committed.order,
                EventPayload::NoteAdded {
                    staff_id: staff_id.clone(),
                    note: note.clone(),
                },
            ));
            Ok(committed.order)
        })
    }

    /// Manually override a table's status
    ///
    /// While the table has an active order only `occupied` is accepted.
    pub fn set_table_status(
        &self,
        ctx: &AccessContext,
        table_id: &str,
        status: TableStatus,
    ) -> OrderResult<Table> {
        ctx.require(TABLE_UPDATE)?;

        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or_else(|| OrderError::TableNotFound(table_id.to_string()))?;
        ctx.ensure_tenant(&table.tenant_id, "table")?;

        if let Some(active) = self
            .storage
            .active_order_for_table_txn(&txn, &table.tenant_id, table_id)?
            && status != TableStatus::Occupied
        {
            return Err(OrderError::TableOccupied {
                table_id: table_id.to_string(),
                order_id: active,
            });
        }
        if table.status == status {
            return Ok(table);
        }

        table.status = status;
        table.version += 1;
        self.storage.put_table_txn(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            tenant_id = %table.tenant_id,
            table_id,
            status = %status,
            actor = %ctx.actor_ref(),
            "Table status overridden"
        );
        self.bus.publish(self.table_event(&table));
        Ok(table)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Get an order; guests only see orders of their own table
    pub fn get_order(&self, ctx: &AccessContext, order_id: &str) -> OrderResult<Order> {
        let order = self
            .storage
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        self.check_read(ctx, &order)?;
        Ok(order)
    }

    /// Status history of an order, oldest first
    pub fn timeline(&self, ctx: &AccessContext, order_id: &str) -> OrderResult<Vec<TimelineEntry>> {
        self.get_order(ctx, order_id)?;
        Ok(self.storage.get_timeline(order_id)?)
    }

    /// Active order of a table, if any
    pub fn order_for_table(&self, ctx: &AccessContext, table_id: &str) -> OrderResult<Option<Order>> {
        let table = self
            .directory
            .find_table(table_id)?
            .ok_or_else(|| OrderError::TableNotFound(table_id.to_string()))?;
        ctx.ensure_tenant(&table.tenant_id, "table")?;
        if ctx.is_anonymous() {
            ctx.require(ORDER_READ_OWN_TABLE)?;
            if ctx.table_id() != Some(table_id) {
                return Err(AuthError::Denied {
                    actor: ctx.actor_ref().to_string(),
                    capability: ORDER_READ.to_string(),
                }
                .into());
            }
        } else {
            ctx.require(ORDER_READ)?;
        }

        match self.storage.active_order_for_table(&table.tenant_id, table_id)? {
            Some(order_id) => Ok(self.storage.get_order(&order_id)?),
            None => Ok(None),
        }
    }

    /// Active orders of the caller's tenant, oldest first (kitchen view)
    pub fn active_orders(&self, ctx: &AccessContext) -> OrderResult<Vec<Order>> {
        ctx.require(ORDER_READ)?;
        Ok(self.storage.list_active_orders(ctx.tenant_id())?)
    }

    fn check_read(&self, ctx: &AccessContext, order: &Order) -> OrderResult<()> {
        ctx.ensure_tenant(&order.tenant_id, "order")?;
        if ctx.is_anonymous() {
            ctx.require(ORDER_READ_OWN_TABLE)?;
            if ctx.table_id() != Some(order.table_id.as_str()) {
                // Do not confirm that another table's order exists
                return Err(OrderError::OrderNotFound(order.id.clone()));
            }
            Ok(())
        } else {
            Ok(ctx.require(ORDER_READ)?)
        }
    }

    // ========================================================================
    // Persistence helpers
    // ========================================================================

    /// Load an order for a mutation, checking tenant and caller's version
    fn load_for_update(
        &self,
        ctx: &AccessContext,
        order_id: &str,
        expected_version: Option<u64>,
    ) -> OrderResult<Order> {
        let order = self
            .storage
            .get_order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        ctx.ensure_tenant(&order.tenant_id, "order")?;
        if let Some(expected) = expected_version
            && expected != order.version
        {
            return Err(stale(&order, expected));
        }
        Ok(order)
    }

    /// Compare-and-swap `snapshot` to `apply(snapshot)` in one write transaction
    ///
    /// Bumps the version, appends a timeline entry when the status changed and
    /// frees the table when the order became terminal.
    fn commit_change(
        &self,
        snapshot: &Order,
        actor: ActorRef,
        reason: Option<String>,
        apply: impl FnOnce(&mut Order),
    ) -> OrderResult<Committed> {
        let now = self.clock.now_millis();
        let txn = self.storage.begin_write()?;
        let current = self
            .storage
            .get_order_txn(&txn, &snapshot.id)?
            .ok_or_else(|| OrderError::OrderNotFound(snapshot.id.clone()))?;
        if current.version != snapshot.version {
            return Err(OrderError::StaleOrder {
                order_id: snapshot.id.clone(),
                expected: snapshot.version,
                actual: current.version,
            });
        }

        let from = current.status;
        let mut updated = current;
        apply(&mut updated);
        updated.version += 1;
        updated.updated_at = now;
        self.storage.put_order_txn(&txn, &updated)?;

        if updated.status != from {
            self.storage.append_timeline_txn(
                &txn,
                &TimelineEntry {
                    order_id: updated.id.clone(),
                    version: updated.version,
                    from: Some(from),
                    to: updated.status,
                    actor,
                    reason,
                    timestamp: now,
                },
            )?;
        }

        let freed_table = if updated.status.is_terminal() && !from.is_terminal() {
            self.free_table_txn(&txn, &updated)?
        } else {
            None
        };
        txn.commit().map_err(StorageError::from)?;

        Ok(Committed {
            order: updated,
            freed_table,
        })
    }

    fn free_table_txn(
        &self,
        txn: &redb::WriteTransaction,
        order: &Order,
    ) -> OrderResult<Option<Table>> {
        let indexed = self
            .storage
            .active_order_for_table_txn(txn, &order.tenant_id, &order.table_id)?;
        if indexed.as_deref() == Some(order.id.as_str()) {
            self.storage
                .clear_active_order_txn(txn, &order.tenant_id, &order.table_id)?;
        }

        let Some(mut table) = self.storage.get_table_txn(txn, &order.table_id)? else {
            return Ok(None);
        };
        if table.current_order_id.as_deref() != Some(order.id.as_str()) {
            return Ok(None);
        }
        table.status = TableStatus::Available;
        table.current_order_id = None;
        table.version += 1;
        self.storage.put_table_txn(txn, &table)?;
        Ok(Some(table))
    }

    // ========================================================================
    // Events
    // ========================================================================

    fn publish_status_change(
        &self,
        before: &Order,
        committed: &Committed,
        actor: ActorRef,
        reason: Option<String>,
    ) {
        tracing::info!(
            order_id = %before.id,
            from = %before.status,
            to = %committed.order.status,
            version = committed.order.version,
            actor = %actor,
            "Order status changed"
        );
        self.bus.publish(self.order_event(
            &committed.order,
            EventPayload::StatusChanged {
                from: before.status,
                to: committed.order.status,
                actor,
                reason,
            },
        ));
        if let Some(table) = &committed.freed_table {
            self.bus.publish(self.table_event(table));
        }
    }

    fn publish_payment(&self, order: &Order) {
        self.bus.publish(self.order_event(
            order,
            EventPayload::PaymentUpdated {
                payment_status: order.payment_status,
                status: order.status,
            },
        ));
    }

    fn order_event(&self, order: &Order, payload: EventPayload) -> DomainEvent {
        DomainEvent {
            tenant_id: order.tenant_id.clone(),
            table_id: order.table_id.clone(),
            order_id: Some(order.id.clone()),
            sequence: order.version,
            timestamp: order.updated_at,
            payload,
        }
    }

    fn table_event(&self, table: &Table) -> DomainEvent {
        DomainEvent {
            tenant_id: table.tenant_id.clone(),
            table_id: table.id.clone(),
            order_id: None,
            sequence: table.version,
            timestamp: self.clock.now_millis(),
            payload: EventPayload::TableStatusChanged {
                status: table.status,
                current_order_id: table.current_order_id.clone(),
            },
        }
    }
}

fn stale(order: &Order, expected: u64) -> OrderError {
    OrderError::StaleOrder {
        order_id: order.id.clone(),
        expected,
        actual: order.version,
    }
}

#[cfg(test)]
mod tests;
