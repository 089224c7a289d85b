//! Structural invariants of the emitted assembly, checked by scanning the
//! output text: determinism, label discipline, and frame discipline.

use dhad::compile;

const PROGRAM: &str = "\
دالة مضروب(ن) {
    اذا (ن < 2) {
        ارجع 1؛
    }
    ارجع ن * مضروب(ن - 1)؛
}

دالة رئيسية() {
    متغير ع = 0؛
    بينما (ع < 5) {
        اطبع(مضروب(ع))؛
        ع = ع + 1؛
    }
    ارجع 0؛
}
";

#[test]
fn pipeline_is_deterministic() {
    let first = compile(PROGRAM).unwrap();
    let second = compile(PROGRAM).unwrap();

    assert_eq!(first, second);
}

#[test]
fn every_branch_target_is_defined_exactly_once() {
    let output = compile(PROGRAM).unwrap();
    let lines = output.lines().collect::<Vec<_>>();

    let mut targets = vec![];
    for line in &lines {
        let trimmed = line.trim_start();
        if trimmed.starts_with('j') {
            let (_, target) = trimmed.split_once('\t').expect("jump has a target");
            if target.starts_with(".L") {
                targets.push(target);
            }
        }
    }
    assert!(!targets.is_empty());

    for target in targets {
        let definitions = lines
            .iter()
            .filter(|line| **line == format!("{target}:"))
            .count();
        assert_eq!(1, definitions, "{target} must be defined exactly once");
    }
}

#[test]
fn every_ret_restores_the_frame() {
    let output = compile(PROGRAM).unwrap();
    let lines = output.lines().collect::<Vec<_>>();

    let mut rets = 0;
    for (index, line) in lines.iter().enumerate() {
        if line.trim_start() != "ret" {
            continue;
        }
        rets += 1;

        assert_eq!(
            Some(&"\tpopq\t%rbp"),
            lines.get(index - 1),
            "ret at line {index} must follow popq %rbp"
        );
        assert_eq!(
            Some(&"\tmovq\t%rbp, %rsp"),
            lines.get(index - 2),
            "ret at line {index} must follow the stack-pointer restore"
        );
    }

    assert!(rets > 0);
}

#[test]
fn pushes_and_pops_balance_in_straight_line_code() {
    let output = compile("دالة رئيسية() { ارجع 1 + 2 * 3 - 4؛ }").unwrap();

    // one epilogue from the return, one from the synthetic fallthrough
    let pushes = output.matches("\tpushq\t").count();
    let pops = output.matches("\tpopq\t").count();
    assert_eq!(pushes + 1, pops);
}

#[test]
fn label_counter_restarts_for_every_compilation() {
    let output = compile(PROGRAM).unwrap();

    assert!(output.contains("\n.L0:\n"));

    let again = compile("دالة رئيسية() { اذا (1) { ارجع 1؛ } ارجع 0؛ }").unwrap();
    assert!(again.contains("\n.L0:\n"));
}
