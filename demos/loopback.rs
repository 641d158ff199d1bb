//! Two links wired back to back: a host asking a simulated breezer for its
//! state over 20-byte packets.
//!
//! Run with `RUST_LOG=vport=trace cargo run --example loopback` to see the
//! packet level logs.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vport::{BleLink, LinkConfig, TransportError};

const STATE_GET: u16 = 0x3231;
const STATE_SET: u16 = 0x3232;

type Queue = Rc<RefCell<VecDeque<Vec<u8>>>>;

fn queue_writer(queue: &Queue) -> impl FnMut(&[u8]) -> bool + use<> {
    let queue = Rc::clone(queue);
    move |packet: &[u8]| {
        queue.borrow_mut().push_back(packet.to_vec());
        true
    }
}

fn main() -> Result<(), TransportError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let to_device: Queue = Rc::default();
    let to_host: Queue = Rc::default();

    let mut host = BleLink::<u16, _>::new(LinkConfig::default(), queue_writer(&to_device))?;
    let mut device = BleLink::<u16, _>::new(LinkConfig::default(), queue_writer(&to_host))?;

    // Device side: remember requests, answered after delivery
    let requests: Rc<RefCell<Vec<u16>>> = Rc::default();
    let pending = Rc::clone(&requests);
    device
        .port_mut()
        .on_frame(move |frame_type, _| pending.borrow_mut().push(frame_type));

    // Host side: the entity polls for state once the link is ready
    let polls = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&polls);
    host.port_mut().on_ready(|| true);
    host.port_mut().on_update(move || *counter.borrow_mut() += 1);
    host.port_mut().on_frame(|frame_type, payload| {
        info!(
            frame_type,
            state = %String::from_utf8_lossy(payload),
            "state received"
        );
    });

    host.open();
    for _ in 0..*polls.borrow() {
        host.send_frame(STATE_GET, &[])?;
    }

    while let Some(packet) = to_device.borrow_mut().pop_front() {
        device.submit_incoming(&packet)?;
    }
    for request in requests.borrow_mut().drain(..) {
        if request == STATE_GET {
            device.send_frame(
                STATE_SET,
                b"power=on;heater=on;target=21;fan=3;out=18;in=-4;filter=172d",
            )?;
        }
    }
    while let Some(packet) = to_host.borrow_mut().pop_front() {
        host.submit_incoming(&packet)?;
    }

    info!(host = ?host.stats(), "host link");
    info!(device = ?device.stats(), "device link");
    Ok(())
}
