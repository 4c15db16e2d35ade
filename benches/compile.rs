use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

use rxn2ode::model::{Modifier, ParameterTable, RateLawTable, ReactionRecord, Tables};
use rxn2ode::{compile, CompileOptions};

/// A linear chain of mass-action reactions with an enzyme modifier on each
fn chain_network(reactions: usize) -> Tables {
    let rate_laws = RateLawTable::from_rows([
        ("mass_action", "{k}*[S1]*[MOD1]"),
        ("delayed", "{k}*[MOD1]"),
    ]);

    let mut parameters = ParameterTable::new();
    let mut records = Vec::with_capacity(reactions);
    for i in 0..reactions {
        parameters.insert(rxn2ode::model::Parameter::new(
            format!("k_r{i}"),
            format!("{}.5", i),
        ));
        records.push(
            ReactionRecord::new("mass_action")
                .with_substrates([format!("X{i}")])
                .with_products([format!("X{}", i + 1)])
                .with_modifiers([Modifier::Species(format!("E{}", i % 4))])
                .with_parameter_refs([format!("k_r{i}")]),
        );
    }
    // one delayed feedback reaction to force the DDE path
    records.push(
        ReactionRecord::new("delayed")
            .with_substrates(["X0".to_string()])
            .with_modifiers([Modifier::Delay {
                species: format!("X{reactions}"),
                expression: "5.0".to_string(),
            }])
            .with_parameter_refs(["k_r0".to_string()]),
    );

    Tables {
        rate_laws,
        parameters,
        reactions: records,
    }
}

fn benchmark_compile(c: &mut Criterion) {
    let options = CompileOptions::default();

    let small = chain_network(10);
    c.bench_function("compile_chain_10", |b| {
        b.iter(|| black_box(compile(&small, &options).unwrap()))
    });

    let large = chain_network(500);
    c.bench_function("compile_chain_500", |b| {
        b.iter(|| black_box(compile(&large, &options).unwrap()))
    });
}

criterion_group!(benches, benchmark_compile);
criterion_main!(benches);
