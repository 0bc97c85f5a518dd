//! Instance fixtures.

use fleetforge_core::{Instance, Node, NodeKind, TimeGrid, Vehicle};

/// A depot plus `consumers` consumer nodes and one producer, on a
/// 12 interval grid of one hour.
pub fn depot_and_consumers(consumers: usize, vehicles: Vec<Vehicle>) -> Instance {
    let time = TimeGrid::new(1.0, 13);
    let mut nodes = vec![Node::new("depot", NodeKind::Depot)];
    for i in 0..consumers {
        nodes.push(
            Node::new(format!("c{i}"), NodeKind::Consumer)
                .with_storage(100.0, 20.0, 60.0)
                .with_energy(vec![10.0; time.steps]),
        );
    }
    nodes.push(
        Node::new("p0", NodeKind::Producer)
            .with_storage(200.0, 100.0, 80.0)
            .with_energy(vec![15.0; time.steps]),
    );
    Instance::new(time, vehicles, nodes).with_name(format!("{consumers}c1p"))
}

/// Three small vans and two large trucks serving two consumers.
pub fn two_type_instance() -> Instance {
    let van = Vehicle::new("van", 30.0, 15.0, 4.0);
    let truck = Vehicle::new("truck", 120.0, 60.0, 9.0);
    depot_and_consumers(
        2,
        vec![van.clone(), van.clone(), van, truck.clone(), truck],
    )
}
