#![forbid(unsafe_code)]

//! Property tests: the active set never exceeds `max_opened` and toasts are
//! shown in the order they were queued.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use blocks_toastr::{
    ToastComponent, ToastConfig, ToastHost, ToastId, ToastRef, ToastView, ToastrService,
    ToastrSettings,
};
use proptest::prelude::*;

struct Note;

impl ToastComponent for Note {
    type Data = ();
    type Output = ();

    fn create(_data: Option<()>) -> Self {
        Note
    }
}

#[derive(Default)]
struct ShowOrder(Vec<ToastId>);

impl ToastHost for ShowOrder {
    fn show(&mut self, view: &ToastView) {
        self.0.push(view.id);
    }

    fn hide(&mut self, _id: ToastId) {}
}

#[derive(Debug, Clone)]
enum Op {
    Queue { animate: bool, duration_ms: u64 },
    Close(usize),
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 0u64..3000).prop_map(|(animate, duration_ms)| Op::Queue {
            animate,
            duration_ms
        }),
        (0usize..16).prop_map(Op::Close),
        (0u64..2000).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn active_set_respects_limit(
        max_opened in 1usize..6,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let service = ToastrService::with_settings(ToastrSettings {
            max_opened,
            ..ToastrSettings::default()
        });
        let host = Rc::new(RefCell::new(ShowOrder::default()));
        service.register_host(host.clone());
        let mut queued: Vec<ToastRef<()>> = Vec::new();

        for op in ops {
            match op {
                Op::Queue { animate, duration_ms } => {
                    queued.push(service.queue_toast::<Note>(
                        ToastConfig::new()
                            .animate(animate)
                            .duration(Duration::from_millis(duration_ms)),
                    ));
                }
                Op::Close(i) => {
                    if let Some(toast) = queued.get(i) {
                        toast.close(None);
                    }
                }
                Op::Advance(ms) => service.advance(Duration::from_millis(ms)),
            }

            prop_assert!(service.active_count() <= max_opened);
            let open = queued.iter().filter(|t| !t.is_closed()).count();
            prop_assert_eq!(service.active_count(), open.min(max_opened));
        }

        let shown = host.borrow().0.clone();
        let order: Vec<ToastId> = queued
            .iter()
            .map(ToastRef::id)
            .filter(|id| shown.contains(id))
            .collect();
        prop_assert_eq!(shown, order);
    }
}
