use correction_eval::{
    EvaluationConfig, EvaluationSummary, Evaluator, FlankingContext, ReadEvaluation, ReadInfo,
};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = EvaluationConfig::new()
        .with_max_candidates(100)?
        .with_min_overlap(8)
        .with_max_read_length(64)
        .with_detail(true);
    let evaluator = Evaluator::new(config)?;

    let reference = b"ACGTTACGTAGGCTAACGTT";
    let corrected = b"ACGTTACGTAGGCTTACGTT";
    let annotations = evaluator.decode("3:G->A;15:A->T;", "-", "5:T;");
    let read = ReadInfo::new("read1", 19)
        .with_span(1001, 1020)
        .with_flanks(FlankingContext::new(b"GGA", b"CCA"));

    let evaluation = evaluator.evaluate(reference, corrected, &read, &annotations)?;
    let mut summary = EvaluationSummary::new(evaluator.config().max_read_length);
    summary.add(&evaluation);

    match &evaluation {
        ReadEvaluation::Classified(best) => {
            info!("{}: total score {}", read.name, best.result.total_score);
            for record in &best.result.records {
                println!("{}", record);
            }
        }
        ReadEvaluation::NotEvaluated(counts) => {
            info!("{}: not evaluated ({:?})", read.name, counts);
        }
    }
    println!("substitutions: {:?}", summary.substitution);
    println!("deletions:     {:?}", summary.deletion);

    let identity = evaluator.percent_identity(reference, corrected, &read.flanks)?;
    println!("identity: {:.2}%", identity.percent());

    Ok(())
}
