use resistor_networks::catalog::{wheatstone_bridge, SINK, SOURCE};
use resistor_networks::circuits::{analyze, ResistorNetwork};
use resistor_networks::config::{ReducerConfig, ReductionStrategy};

fn main() {
    // Unbalanced bridge, so the bridging arm matters.
    let bridges = [1.0_f64, 10.0, 100.0, 300.0, 1.0e3, 1.0e4];

    println!("R_cd(ohm), R_eq(ohm), R_eq_delta_wye(ohm), method");
    for r_cd in bridges {
        let network = match ResistorNetwork::from_resistors(wheatstone_bridge(100.0, 200.0, 200.0, 100.0, r_cd)) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("skipping R_cd = {r_cd}: {e}");
                continue;
            }
        };
        let plain = analyze(&network, SOURCE, SINK, &ReducerConfig::default());
        let dy = analyze(
            &network,
            SOURCE,
            SINK,
            &ReducerConfig::default().with_strategy(ReductionStrategy::SeriesParallelDeltaWye),
        );
        match (plain, dy) {
            (Ok(p), Ok(d)) => println!("{r_cd:.6e}, {:.6e}, {:.6e}, {:?}", p.ohms, d.ohms, p.method),
            (Err(e), _) | (_, Err(e)) => eprintln!("R_cd = {r_cd}: {e}"),
        }
    }
}
