// Tests for coupling validation in the builder
#[cfg(test)]
mod tests {
    use super::super::models::{Collector, Relay, Ticker};
    use crate::core::builder::Simulation;
    use crate::core::error::SimError;

    #[test]
    fn test_auto_generated_ids() {
        let mut sim = Simulation::new();
        let a = sim.add_component(Ticker::new(1.0, 1));
        let b = sim.add_component(Ticker::new(1.0, 1));
        let c = sim.add_component(Collector::default());

        assert_eq!(a.id(), "Ticker0");
        assert_eq!(b.id(), "Ticker1");
        assert_eq!(c.id(), "Collector2");
        assert!(a.module_type().ends_with("Ticker"));
        assert!(sim.has_component(&c));
    }

    #[test]
    fn test_duplicate_named_component_rejected() {
        let mut sim = Simulation::new();
        sim.add_named_component("relay", Relay::default()).unwrap();
        let result = sim.add_named_component("relay", Relay::default());
        assert!(matches!(result, Err(SimError::DuplicateComponent(name)) if name == "relay"));
    }

    #[test]
    fn test_unknown_port_lists_valid_ports() {
        let mut sim = Simulation::new();
        let ticker = sim.add_component(Ticker::new(1.0, 1));
        let relay = sim.add_component(Relay::default());

        match sim.connect(ticker.output("missing"), relay.input("in")) {
            Err(SimError::PortNotFound { port, valid, .. }) => {
                assert_eq!(port, "missing");
                assert_eq!(valid, vec!["out".to_string()]);
            }
            other => panic!("expected PortNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_direction_is_checked() {
        let mut sim = Simulation::new();
        let relay_a = sim.add_component(Relay::default());
        let relay_b = sim.add_component(Relay::default());

        // "in" is not an output, "out" is not an input
        assert!(sim.connect(relay_a.output("in"), relay_b.input("in")).is_err());
        assert!(sim.connect(relay_a.output("out"), relay_b.input("out")).is_err());
        assert_eq!(sim.connection_count(), 0);
    }

    #[test]
    fn test_unknown_component_rejected() {
        let mut sim = Simulation::new();
        let ticker = sim.add_component(Ticker::new(1.0, 1));

        let mut other = Simulation::new();
        other.add_component(Collector::default());
        let stranger = other.add_named_component("elsewhere", Collector::default()).unwrap();

        let result = sim.connect(ticker.output("out"), stranger.input("in"));
        assert!(matches!(result, Err(SimError::ComponentNotFound(_))));
    }

    #[test]
    fn test_fan_in_and_fan_out_allowed_duplicates_not() {
        let mut sim = Simulation::new();
        let t1 = sim.add_component(Ticker::new(1.0, 1));
        let t2 = sim.add_component(Ticker::new(1.0, 1));
        let c1 = sim.add_component(Collector::default());
        let c2 = sim.add_component(Collector::default());

        sim.connect(t1.output("out"), c1.input("in")).unwrap();
        sim.connect(t1.output("out"), c2.input("in")).unwrap();
        sim.connect(t2.output("out"), c1.input("in")).unwrap();
        assert_eq!(sim.connection_count(), 3);

        let duplicate = sim.connect(t1.output("out"), c1.input("in"));
        assert!(matches!(duplicate, Err(SimError::DuplicateCoupling { .. })));
        assert_eq!(sim.connection_count(), 3);
    }
}
