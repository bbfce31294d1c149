//! Contact visibility.
//!
//! The one place that decides whether a counterparty's contact details may
//! be rendered. Screens call [`contact_visibility`] and then
//! [`contact_panel`] instead of inlining status checks.

use crate::domain::{ContactBundle, ContactEntry, Role};

use super::order_status::OrderStatus;
use super::response_status::ResponseStatus;

/// Inputs to the visibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityContext {
    /// Who is looking.
    pub viewer: Role,
    /// Status of the response that links viewer and counterparty, if any.
    pub response: Option<ResponseStatus>,
    /// Status of the owning order. `None` means the entry point has no order
    /// context at all.
    pub order: Option<OrderStatus>,
    /// Whether `order.additional.executor_contacts` was captured at selection.
    pub snapshot_present: bool,
}

impl VisibilityContext {
    /// Context for entry points that carry no order or response information.
    pub fn without_order(viewer: Role) -> Self {
        Self {
            viewer,
            response: None,
            order: None,
            snapshot_present: false,
        }
    }

    pub fn has_order_context(&self) -> bool {
        self.order.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Decides whether the counterparty's contacts may be shown to `ctx.viewer`.
pub fn contact_visibility(ctx: &VisibilityContext) -> Visibility {
    let Some(order) = ctx.order else {
        // Legacy entry points without order context always showed contacts.
        return Visibility::Visible;
    };

    // After selection the order-level snapshot is authoritative. It only
    // exists when the selected response had exchanged contacts.
    if order.is_post_selection() || order.is_mediator() {
        return if ctx.snapshot_present {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }

    let Some(response) = ctx.response else {
        return Visibility::Hidden;
    };

    let visible = match ctx.viewer {
        Role::Customer => matches!(
            response,
            ResponseStatus::ContactsExchanged | ResponseStatus::Selected
        ),
        Role::Executor | Role::Mediator => matches!(
            response,
            ResponseStatus::CustomerContactsSent
                | ResponseStatus::ContactsExchanged
                | ResponseStatus::Selected
        ),
    };

    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

/// What a contacts block renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactPanel {
    /// Policy forbids showing anything yet.
    Hidden,
    /// Allowed, but there is nothing to show: render the explanatory panel.
    Unavailable,
    /// Allowed; only the channels actually present.
    Shown(Vec<ContactEntry>),
}

/// Renders a visibility decision against a (possibly missing) bundle.
pub fn contact_panel(visibility: Visibility, bundle: Option<&ContactBundle>) -> ContactPanel {
    if !visibility.is_visible() {
        return ContactPanel::Hidden;
    }
    let entries = bundle.map(ContactBundle::entries).unwrap_or_default();
    if entries.is_empty() {
        ContactPanel::Unavailable
    } else {
        ContactPanel::Shown(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactChannel;
    use crate::lifecycle::SuccessCode;

    fn ctx(viewer: Role, response: Option<ResponseStatus>, order: OrderStatus) -> VisibilityContext {
        VisibilityContext {
            viewer,
            response,
            order: Some(order),
            snapshot_present: false,
        }
    }

    #[test]
    fn test_customer_needs_exchange() {
        let order = OrderStatus::SelectingExecutor;
        let seen: Vec<bool> = ResponseStatus::ALL
            .iter()
            .map(|r| contact_visibility(&ctx(Role::Customer, Some(*r), order)).is_visible())
            .collect();
        // New, Rejected, CustomerContactsSent, ContactsExchanged, Selected
        assert_eq!(seen, vec![false, false, false, true, true]);
    }

    #[test]
    fn test_executor_sees_customer_after_customer_sends() {
        let order = OrderStatus::SearchExecutor;
        for role in [Role::Executor, Role::Mediator] {
            let seen: Vec<bool> = ResponseStatus::ALL
                .iter()
                .map(|r| contact_visibility(&ctx(role, Some(*r), order)).is_visible())
                .collect();
            assert_eq!(seen, vec![false, false, true, true, true]);
        }
    }

    #[test]
    fn test_monotonic_along_handshake() {
        let forward = [
            ResponseStatus::New,
            ResponseStatus::CustomerContactsSent,
            ResponseStatus::ContactsExchanged,
            ResponseStatus::Selected,
        ];
        for role in [Role::Customer, Role::Executor, Role::Mediator] {
            for (i, s) in forward.iter().enumerate() {
                let at_s = contact_visibility(&ctx(role, Some(*s), OrderStatus::SelectingExecutor));
                if at_s.is_visible() {
                    for later in &forward[i..] {
                        let v = contact_visibility(&ctx(role, Some(*later), OrderStatus::SelectingExecutor));
                        assert!(v.is_visible(), "{role:?} {s} -> {later}");
                    }
                }
                let rejected =
                    contact_visibility(&ctx(role, Some(ResponseStatus::Rejected), OrderStatus::SelectingExecutor));
                assert_eq!(rejected, Visibility::Hidden);
            }
        }
    }

    #[test]
    fn test_snapshot_supersedes_response_after_selection() {
        for order in [
            OrderStatus::InWork,
            OrderStatus::AwaitingConfirmation,
            OrderStatus::Rejected,
            OrderStatus::Closed(SuccessCode::Closed),
            OrderStatus::Closed(SuccessCode::Completed),
        ] {
            // A stale response status does not matter, only the snapshot does.
            let mut c = ctx(Role::Customer, Some(ResponseStatus::New), order);
            assert_eq!(contact_visibility(&c), Visibility::Hidden);
            c.snapshot_present = true;
            assert_eq!(contact_visibility(&c), Visibility::Visible);
        }
    }

    #[test]
    fn test_no_order_context_falls_back_to_visible() {
        let c = VisibilityContext::without_order(Role::Customer);
        assert!(!c.has_order_context());
        assert_eq!(contact_visibility(&c), Visibility::Visible);
    }

    #[test]
    fn test_missing_response_hides() {
        let c = ctx(Role::Customer, None, OrderStatus::SearchExecutor);
        assert_eq!(contact_visibility(&c), Visibility::Hidden);
    }

    #[test]
    fn test_panel_suppresses_only_missing_fields() {
        let bundle = ContactBundle {
            phone: Some("+100".into()),
            telegram: Some("@exec".into()),
            ..ContactBundle::default()
        };
        let panel = contact_panel(Visibility::Visible, Some(&bundle));
        let ContactPanel::Shown(entries) = panel else {
            panic!("expected shown panel, got {panel:?}");
        };
        let channels: Vec<ContactChannel> = entries.iter().map(|e| e.channel).collect();
        assert_eq!(channels, vec![ContactChannel::Phone, ContactChannel::Telegram]);
    }

    #[test]
    fn test_panel_empty_bundle_is_unavailable() {
        assert_eq!(
            contact_panel(Visibility::Visible, Some(&ContactBundle::default())),
            ContactPanel::Unavailable
        );
        assert_eq!(contact_panel(Visibility::Visible, None), ContactPanel::Unavailable);
        assert_eq!(
            contact_panel(Visibility::Hidden, Some(&ContactBundle::default())),
            ContactPanel::Hidden
        );
    }
}
