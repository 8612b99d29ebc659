//! Wiring and evaluation throughput for a fan-in graph.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use slotgraph_core::graph::{
    EvalDatas, Frame, Graph, NodeDatas, NodeWeak, SlotDatas, SlotRef, SlotWeak,
};
use slotgraph_core::{GraphError, NodeKind, Result};

struct Constant(f64);

impl NodeKind for Constant {
    fn eval(&mut self, _frame: Frame, _inputs: &[SlotRef], _trigger: &SlotWeak) -> Result<()> {
        Err(GraphError::Failed)
    }
}

#[derive(Default)]
struct Sum(f64);

impl NodeKind for Sum {
    fn eval(&mut self, frame: Frame, inputs: &[SlotRef], trigger: &SlotWeak) -> Result<()> {
        let trigger = trigger.upgrade().ok_or(GraphError::SlotNull)?;
        let mut total = 0.0;
        for input in inputs {
            for upstream in input.borrow().connected_nodes() {
                let upstream = upstream.borrow();
                if let Some(constant) = upstream.kind::<Constant>() {
                    total += constant.0;
                }
            }
        }
        self.0 = total;
        trigger
            .borrow_mut()
            .set_last_evaluated_datas(EvalDatas::new(frame));
        Ok(())
    }
}

/// A sum node with `width` inputs, each fed by its own constant.
fn fan_in(width: usize) -> (Graph, NodeWeak, SlotWeak) {
    let graph = Graph::default();
    let sum = graph.create_child_node_with_kind(NodeDatas::new("sum", "Sum"), Sum::default());
    let sum_ref = sum.upgrade().expect("sum node");
    let out = sum_ref
        .borrow_mut()
        .create_slot(SlotDatas::output("out", "f64"))
        .expect("sum output");

    for i in 0..width {
        let datas = NodeDatas::new(format!("c{i}"), "Constant");
        let constant = graph.create_child_node_with_kind(datas, Constant(i as f64));
        let from = constant
            .upgrade()
            .expect("constant node")
            .borrow_mut()
            .create_slot(SlotDatas::output("value", "f64"))
            .expect("constant output");
        let to = sum_ref
            .borrow_mut()
            .create_slot(SlotDatas::input(format!("in{i}"), "f64"))
            .expect("sum input");
        Graph::connect_slots(&from, &to).expect("connect");
    }
    (graph, sum, out)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_fan_in");
    for width in [8, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| black_box(fan_in(width)));
        });
    }
    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_fan_in");
    for width in [8, 64, 512] {
        let (_graph, sum, out) = fan_in(width);
        let sum = sum.upgrade().expect("sum node");
        let mut frame = 0;
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| {
                frame += 1;
                sum.borrow_mut().eval(black_box(frame), &out)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_eval);
criterion_main!(benches);
