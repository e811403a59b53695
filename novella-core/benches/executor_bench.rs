use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use novella_core::event::{InputEvent, OutputEvent};
use novella_core::renderer::driver::{Driver, ExecutorHandle};
use novella_core::renderer::Renderer;
use novella_core::{Ctx, ScriptManager};
use novella_script::{CompileOptions, MemorySource};

fn make_script(lines: usize) -> String {
    let mut buf = String::with_capacity(lines * 40);
    for i in 0..lines {
        match i % 8 {
            0 => buf.push_str(&format!("@bg file=bg{i}.png duration=1.0\n")),
            1 => buf.push_str(&format!("*Alice*dialogue {i}\n")),
            2 => buf.push_str(&format!("@set $1 += {i}\n")),
            3 => buf.push_str(&format!("@choose c{i}_a A c{i}_b B\n:c{i}_a\n:c{i}_b\n")),
            4 => buf.push_str(&format!("Bob「line {i}」\n")),
            5 => buf.push_str("&empty\n"),
            6 => buf.push_str(&format!("@se file=se{i}.ogg\n")),
            7 => buf.push_str(&format!("narration {i}\n")),
            _ => unreachable!(),
        }
    }
    buf.push_str("@goto end\n:empty\n@return\n:end\n");
    buf
}

struct NullRenderer;
impl Renderer for NullRenderer {
    fn render(&mut self, out: &OutputEvent) -> Option<InputEvent> {
        match out {
            OutputEvent::ShowChoice { .. } => Some(InputEvent::ChoiceMade { index: 0 }),
            OutputEvent::ShowDialogue { .. } | OutputEvent::ShowMessage { .. } => {
                Some(InputEvent::Continue)
            }
            _ => None,
        }
    }
}

fn bench_executor(c: &mut Criterion) {
    const LINES: usize = 10_000;
    let manager = Arc::new(ScriptManager::with_source(
        MemorySource::new().with("bench.txt", make_script(LINES)),
        CompileOptions::default(),
    ));
    let mut group = c.benchmark_group("executor");
    group.sample_size(10);

    group.bench_function("step 10k commands", |b| {
        b.iter_batched(
            || (Ctx::default(), manager.clone()),
            |(mut ctx, manager)| {
                let handle = ExecutorHandle::new(&mut ctx, manager, "bench.txt").unwrap();
                let mut drv = Driver::new(handle, NullRenderer);
                drv.run(black_box(&mut ctx)).unwrap();
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_executor);
criterion_main!(benches);
