//! Replays a synthetic campus scenario and prints the final report.
//!
//! The topology is a hub station connected to `--stations` base stations,
//! each serving a share of `--users` user nodes. Messages travel
//! user → station → user; a fraction of the transfers abort, and every
//! delivered message is eventually removed from the relaying station's
//! buffer.

use clap::Parser;
use dtnstat::{
    Bandwidth, Event, EventKind, FinalizeInputs, Message, NodeRole, Position, Reporter,
    RouteHints, SimTime, Snapshot, SnapshotBuilder,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Parser)]
struct Command {
    #[arg(long, default_value = "3")]
    stations: usize,

    #[arg(long, default_value = "12")]
    users: usize,

    #[arg(long, default_value = "50")]
    messages: usize,

    /// warm-up interval, e.g. "10s" or "1m 30s"
    #[arg(long, default_value = "10s")]
    warm_up: SimTime,

    #[arg(long, default_value = "1mbps")]
    bandwidth: Bandwidth,

    #[arg(long, default_value = "42")]
    seed: u64,
}

fn build_snapshot(cmd: &Command, rng: &mut StdRng) -> Snapshot {
    let mut builder = SnapshotBuilder::new();

    let hub = builder.add_node("hub", NodeRole::Infrastructure, Position::new(0.0, 0.0));
    let mut stations = Vec::new();
    for s in 0..cmd.stations {
        let station = builder.add_node(
            format!("bs{}", s + 1),
            NodeRole::Infrastructure,
            Position::new(100.0 * (s + 1) as f64, 0.0),
        );
        builder.connect(hub, station).unwrap();
        stations.push(station);
    }
    for u in 0..cmd.users {
        let station = stations[u % stations.len()];
        let user = builder.add_node(
            format!("user{}", u + 1),
            NodeRole::Leaf,
            Position::new(
                100.0 * (u % stations.len() + 1) as f64 + rng.gen_range(-40.0..40.0),
                rng.gen_range(5.0..60.0),
            ),
        );
        builder.connect(station, user).unwrap();
    }

    builder.build()
}

fn main() {
    let cmd = Command::parse();
    let mut rng = StdRng::seed_from_u64(cmd.seed);

    let snapshot = build_snapshot(&cmd, &mut rng);
    let mut reporter = Reporter::with_warm_up(cmd.warm_up);
    let mut hints_a = RouteHints::new("user1");
    let mut hints_b = RouteHints::new(format!("user{}", cmd.users));

    let mut now = 0.0;
    for i in 0..cmd.messages {
        now += rng.gen_range(0.5..3.0);

        let origin = format!("user{}", rng.gen_range(1..=cmd.users));
        let station = rng.gen_range(1..=cmd.stations) as u32;
        let destination = format!("user{}", rng.gen_range(1..=cmd.users));
        let mut message = Message::new(format!("M{i}"), origin.clone(), SimTime::from_seconds(now));

        // endpoints of interest record every station they touch
        if origin == hints_a.endpoint() || destination == hints_a.endpoint() {
            hints_a.record(station);
        }
        if origin == hints_b.endpoint() || destination == hints_b.endpoint() {
            hints_b.record(station);
        }

        reporter
            .on_event(Event {
                at: SimTime::from_seconds(now),
                message: &message,
                kind: EventKind::Created,
            })
            .unwrap();

        let station_name = format!("bs{station}");
        reporter
            .on_event(Event {
                at: SimTime::from_seconds(now + 0.1),
                message: &message,
                kind: EventKind::TransferStarted {
                    from: &origin,
                    to: &station_name,
                },
            })
            .unwrap();

        if rng.gen_bool(0.15) {
            reporter
                .on_event(Event {
                    at: SimTime::from_seconds(now + 0.2),
                    message: &message,
                    kind: EventKind::TransferAborted {
                        from: &origin,
                        to: &station_name,
                    },
                })
                .unwrap();
            continue;
        }

        message.record_hop(&station_name);
        message.set_receive_time(SimTime::from_seconds(now + 0.5));
        reporter
            .on_event(Event {
                at: SimTime::from_seconds(now + 0.5),
                message: &message,
                kind: EventKind::Transferred {
                    from: &origin,
                    to: &station_name,
                    final_target: false,
                },
            })
            .unwrap();

        message.record_hop(&destination);
        reporter
            .on_event(Event {
                at: SimTime::from_seconds(now + rng.gen_range(1.0..8.0)),
                message: &message,
                kind: EventKind::Transferred {
                    from: &station_name,
                    to: &destination,
                    final_target: true,
                },
            })
            .unwrap();

        // the relaying station clears its buffer copy
        reporter
            .on_event(Event {
                at: SimTime::from_seconds(now + 10.0),
                message: &message,
                kind: EventKind::Deleted {
                    node: &station_name,
                    dropped: false,
                },
            })
            .unwrap();
    }

    let report = reporter
        .finalize(&FinalizeInputs {
            scenario: "campus",
            sim_time: SimTime::from_seconds(now + 10.0),
            snapshot: &snapshot,
            hints_a: &hints_a,
            hints_b: &hints_b,
            designated: "bs1",
            bandwidth: cmd.bandwidth,
        })
        .expect("the synthetic feed respects the ordering contract");

    println!("{report}");
}
