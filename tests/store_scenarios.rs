use checkout_sim::grocery::{
    lane_port, CustomerData, Distributor, DistributorPhase, Generator, GeneratorConfig,
    GroceryStore, Lane, Packer, PaymentProcessor, ScriptedSource, StoreConfig, Traveler,
};
use checkout_sim::{Simulation, SimulationConfig, SimulationEngine, PASSIVE};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn recording() -> Simulation {
    Simulation::with_config(SimulationConfig::default().with_output_recording(true))
}

fn ids(outputs: &[(f64, CustomerData)]) -> Vec<i64> {
    outputs.iter().map(|(_, c)| c.customer_id).collect()
}

/// Every lane and the payment processor is idle exactly when it is passive
fn assert_idle_iff_passive(store: &GroceryStore, engine: &SimulationEngine) {
    for (lane_id, id) in store.lanes.iter().enumerate() {
        let lane = store.lane_model(engine, lane_id).unwrap();
        let ta = engine.time_advance_of(id).unwrap();
        assert_eq!(lane.is_busy(), ta.is_finite(), "lane {} at t={}", lane_id, engine.current_time());
    }
    let payment = engine.component::<PaymentProcessor>(&store.payment).unwrap();
    let ta = engine.time_advance_of(&store.payment).unwrap();
    assert_eq!(payment.is_busy(), ta.is_finite());
}

fn assert_distributor_bookkeeping(store: &GroceryStore, engine: &SimulationEngine) {
    let distributor = store.distributor_model(engine).unwrap();
    for lane in 0..distributor.total_lanes() {
        let queue = distributor.queue_lengths()[lane];
        assert!(queue <= distributor.max_queue());
        assert_eq!(
            distributor.routed_per_lane()[lane] - distributor.freed_per_lane()[lane],
            queue as u64,
            "lane {} at t={}",
            lane,
            engine.current_time()
        );
    }
}

/// Once the distributor has flushed its routing decisions, each counter is
/// the number of customers actually at that lane, and every routed walk-in is
/// either somewhere downstream or has left the store
fn assert_customers_accounted_for(store: &GroceryStore, engine: &SimulationEngine) {
    let distributor = store.distributor_model(engine).unwrap();
    if distributor.phase() != DistributorPhase::Idle {
        return;
    }

    let mut at_lanes = 0;
    for (lane, &queue) in distributor.queue_lengths().iter().enumerate() {
        let occupancy = store.lane_model(engine, lane).unwrap().occupancy();
        assert_eq!(occupancy, queue as usize, "lane {} at t={}", lane, engine.current_time());
        at_lanes += occupancy as u64;
    }

    let payment = engine.component::<PaymentProcessor>(&store.payment).unwrap();
    let paying = payment.queue_len() as u64 + u64::from(payment.is_busy());
    let walking = engine.component::<Traveler>(&store.traveler).unwrap().in_flight() as u64;
    let done = store.walk_in_sink_model(engine).unwrap().count();
    assert_eq!(
        distributor.routed(),
        done + at_lanes + paying + walking,
        "t={}",
        engine.current_time()
    );
}

#[test]
fn test_lane_serves_for_items_times_rate() {
    init_logging();
    let mut sim = recording();
    let source = sim.add_component(ScriptedSource::new(vec![(0.0, CustomerData::walk_in(1, 5, 60.0))]));
    let lane = sim.add_named_component("lane", Lane::new(0, 1.0)).unwrap();
    sim.connect(
        source.output(ScriptedSource::<CustomerData>::OUT),
        lane.input(Lane::IN_CUSTOMER),
    )
    .unwrap();

    let mut engine = sim.build().unwrap();
    engine.run_until(4.999).unwrap();
    assert_eq!(engine.time_advance_of(&lane).unwrap(), 5.0);
    assert!(engine.outputs::<CustomerData>(&lane.output(Lane::OUT_TO_PAYMENT)).unwrap().is_empty());

    engine.run().unwrap();
    let paid = engine.outputs::<CustomerData>(&lane.output(Lane::OUT_TO_PAYMENT)).unwrap();
    let freed = engine.outputs::<usize>(&lane.output(Lane::OUT_FREE)).unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].0, 5.0);
    assert_eq!(paid[0].1.customer_id, 1);
    assert_eq!(freed, vec![(5.0, 0)]);
    assert_eq!(engine.time_advance_of(&lane).unwrap(), PASSIVE);
}

#[test]
fn test_lane_feeds_payment_within_card_range() {
    init_logging();
    let mut sim = recording();
    let source = sim.add_component(ScriptedSource::new(vec![(0.0, CustomerData::walk_in(7, 5, 60.0))]));
    let lane = sim.add_named_component("lane", Lane::new(0, 1.0)).unwrap();
    let payment = sim
        .add_named_component("payment", PaymentProcessor::default())
        .unwrap();
    sim.connect(source.output("out"), lane.input(Lane::IN_CUSTOMER)).unwrap();
    sim.connect(lane.output(Lane::OUT_TO_PAYMENT), payment.input(PaymentProcessor::IN_CUSTOMER))
        .unwrap();

    let mut engine = sim.build().unwrap();
    engine.run().unwrap();

    let done = engine
        .outputs::<CustomerData>(&payment.output(PaymentProcessor::OUT_CUSTOMER))
        .unwrap();
    assert_eq!(ids(&done), vec![7]);
    assert!(done[0].0 >= 10.0 && done[0].0 < 20.0, "paid at {}", done[0].0);
}

#[test]
fn test_generator_silent_while_held() {
    init_logging();
    let mut sim = recording();
    let generator = sim
        .add_named_component("generator", Generator::new(&GeneratorConfig::default()).unwrap())
        .unwrap();
    let hold = sim
        .add_named_component("hold", ScriptedSource::new(vec![(10.0, true)]))
        .unwrap();
    let ok = sim
        .add_named_component("ok", ScriptedSource::new(vec![(500.0, true)]))
        .unwrap();
    sim.connect(hold.output("out"), generator.input(Generator::IN_HOLD)).unwrap();
    sim.connect(ok.output("out"), generator.input(Generator::IN_OK)).unwrap();

    let mut engine = sim.build().unwrap();
    engine.run_until(499.0).unwrap();
    assert!(engine.component::<Generator>(&generator).unwrap().is_paused());
    assert_eq!(engine.time_advance_of(&generator).unwrap(), PASSIVE);

    engine.run_until(5000.0).unwrap();
    let emitted = engine
        .outputs::<CustomerData>(&generator.output(Generator::OUT_CUSTOMER))
        .unwrap();
    let before: Vec<_> = emitted.iter().filter(|(t, _)| *t <= 10.0).collect();
    let after: Vec<_> = emitted.iter().filter(|(t, _)| *t > 10.0).collect();

    // Customer 0 leaves at t=0, before the hold
    assert!(!before.is_empty());
    assert_eq!(before[0].0, 0.0);
    assert!(!after.is_empty());
    assert!(after.iter().all(|(t, _)| *t >= 500.0));
    // Ids continue where they stopped
    assert_eq!(after[0].1.customer_id, before.len() as i64);
    assert_eq!(engine.component::<Generator>(&generator).unwrap().pauses(), 1);
}

#[test]
fn test_full_store_raises_hold() {
    init_logging();
    let config = StoreConfig::default().with_lanes(1, 1).with_max_queue(2);
    let arrivals = (1..=5)
        .map(|id| (0.0, CustomerData::walk_in(id, 5, 60.0)))
        .collect();

    let mut sim = recording();
    let (store, _) = GroceryStore::with_script(&mut sim, &config, arrivals).unwrap();
    let mut engine = sim.build().unwrap();
    engine.run_until(0.0).unwrap();

    let distributor = store.distributor_model(&engine).unwrap();
    assert_eq!(distributor.queue_lengths(), &[2, 2]);
    assert_eq!(distributor.dropped(), &[5]);

    // One customer in service and one waiting at each lane
    assert_eq!(store.lane_model(&engine, 0).unwrap().occupancy(), 2);
    assert_eq!(store.lane_model(&engine, 1).unwrap().occupancy(), 2);
    assert_eq!(store.lane_model(&engine, 1).unwrap().waiting_len(), 1);

    let holds = engine.outputs::<bool>(&store.distributor.output(Distributor::OUT_HOLD)).unwrap();
    assert_eq!(holds, vec![(0.0, true)]);
    let chosen: Vec<usize> = engine
        .outputs::<usize>(&store.distributor.output(Distributor::OUT_WHICH_LANE))
        .unwrap()
        .into_iter()
        .map(|(_, lane)| lane)
        .collect();
    // Small baskets fill self-checkout first
    assert_eq!(chosen, vec![1, 1, 0, 0]);
}

#[test]
fn test_traveler_releases_in_arrival_order() {
    init_logging();
    let mut sim = recording();
    let source = sim.add_component(ScriptedSource::new(vec![
        (0.0, CustomerData::walk_in(1, 1, 3.0)),
        (0.0, CustomerData::walk_in(2, 1, 5.0)),
    ]));
    let traveler = sim.add_named_component("traveler", Traveler::new()).unwrap();
    sim.connect(source.output("out"), traveler.input(Traveler::IN_CUSTOMER)).unwrap();

    let mut engine = sim.build().unwrap();
    engine.run_until(0.0).unwrap();
    assert_eq!(engine.time_advance_of(&traveler).unwrap(), 3.0);

    engine.run().unwrap();
    let arrived = engine
        .outputs::<CustomerData>(&traveler.output(Traveler::OUT_ARRIVED))
        .unwrap();
    let times: Vec<f64> = arrived.iter().map(|(t, _)| *t).collect();
    assert_eq!(ids(&arrived), vec![1, 2]);
    assert_eq!(times, vec![3.0, 5.0]);
}

#[test]
fn test_generated_store_holds_invariants_every_step() {
    init_logging();
    let config = StoreConfig::default()
        .with_generator(GeneratorConfig {
            arrival_mean: 2.0,
            ..GeneratorConfig::default()
        })
        .with_seed(11);
    assert_eq!(config.max_queue, 2);

    let mut sim = Simulation::with_config(SimulationConfig::default().with_seed(config.seed));
    let store = GroceryStore::build(&mut sim, &config).unwrap();
    let mut engine = sim.build().unwrap();

    while engine.current_time() < 1200.0 {
        assert!(engine.step().unwrap());
        assert_distributor_bookkeeping(&store, &engine);
        assert_customers_accounted_for(&store, &engine);
        assert_idle_iff_passive(&store, &engine);
    }

    let distributor = store.distributor_model(&engine).unwrap();
    assert!(distributor.holds_issued() > 0);
    assert!(!distributor.dropped().is_empty());
    let generator = engine
        .component::<Generator>(store.generator.as_ref().unwrap())
        .unwrap();
    assert!(generator.pauses() > 0);
}

#[test]
fn test_default_lanes_count_waiting_customers() {
    init_logging();
    let config = StoreConfig::default()
        .with_generator(GeneratorConfig {
            arrival_mean: 10.0,
            ..GeneratorConfig::default()
        })
        .with_seed(5);

    let mut sim = Simulation::with_config(SimulationConfig::default().with_seed(config.seed));
    let store = GroceryStore::build(&mut sim, &config).unwrap();
    let mut engine = sim.build().unwrap();

    let mut waited = false;
    while engine.current_time() < 5000.0 {
        assert!(engine.step().unwrap());
        assert_distributor_bookkeeping(&store, &engine);
        assert_customers_accounted_for(&store, &engine);
        waited |= (0..store.lanes.len())
            .any(|lane| store.lane_model(&engine, lane).unwrap().waiting_len() > 0);
    }
    assert!(waited, "no lane ever had a second customer");
    while store.distributor_model(&engine).unwrap().phase() != DistributorPhase::Idle {
        engine.step().unwrap();
    }

    let distributor = store.distributor_model(&engine).unwrap();
    for lane in 0..store.lanes.len() {
        let model = store.lane_model(&engine, lane).unwrap();
        assert_eq!(
            model.served() + model.occupancy() as u64,
            distributor.routed_per_lane()[lane]
        );
        assert_eq!(model.served(), distributor.freed_per_lane()[lane]);
    }
}

#[test]
fn test_walk_ins_and_online_orders_stay_apart() {
    init_logging();
    let config = StoreConfig::default();
    let mut arrivals = Vec::new();
    for id in 0..20 {
        let t = id as f64 * 40.0;
        let customer = if id % 3 == 0 {
            CustomerData::online(id, 10, 30.0, 20.0)
        } else {
            CustomerData::walk_in(id, 3 + (id as u32 % 25), 45.0)
        };
        arrivals.push((t, customer));
    }

    let mut sim = recording();
    let (store, _) = GroceryStore::with_script(&mut sim, &config, arrivals).unwrap();
    let mut engine = sim.build().unwrap();
    engine.run_until(5000.0).unwrap();

    for lane in 0..store.lanes.len() {
        let sent = engine
            .outputs::<CustomerData>(&store.distributor.output(&lane_port(lane)))
            .unwrap();
        assert!(sent.iter().all(|(_, c)| !c.is_online_order));
    }
    let packed = engine
        .outputs::<CustomerData>(&store.pickup.packer.output(Packer::OUT_PACKED))
        .unwrap();
    assert_eq!(packed.len(), 7);
    assert!(packed.iter().all(|(_, c)| c.is_online_order));

    let walk_ins = store.walk_in_sink_model(&engine).unwrap();
    let online = store.online_sink_model(&engine).unwrap();
    assert_eq!(online.count(), 7);
    assert!(walk_ins.customer_ids().iter().all(|id| id % 3 != 0));
    assert!(online.customer_ids().iter().all(|id| id % 3 == 0));
    assert_eq!(walk_ins.count(), 13);
}
