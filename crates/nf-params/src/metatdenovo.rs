//! Parameter table for the nf-core/metatdenovo pipeline.
//!
//! Declaration order is the order flags appear on the Nextflow command line.

use once_cell::sync::Lazy;

use crate::descriptor::{ParamType, ParamValue, ParameterDescriptor};
use crate::schema::ParameterSchema;

/// Identifier used to namespace uploaded artifacts.
pub const PIPELINE_ID: &str = "nf_nf_core_metatdenovo";

/// Display name of the workflow.
pub const DISPLAY_NAME: &str = "nf-core/metatdenovo";

/// Short workflow description shown alongside the parameter form.
pub const DESCRIPTION: &str =
    "Assembly and annotation of metatranscriptomic or metagenomic data for prokaryotes, eukaryotes and viruses.";

static SCHEMA: Lazy<ParameterSchema> = Lazy::new(|| {
    build().unwrap_or_else(|err| panic!("metatdenovo parameter table is invalid: {}", err))
});

/// The process-wide metatdenovo schema.
pub fn schema() -> &'static ParameterSchema {
    &SCHEMA
}

fn build() -> crate::Result<ParameterSchema> {
    ParameterSchema::builder()
        .param(
            ParameterDescriptor::required(
                "input",
                ParamType::File,
                "Path to comma-separated file containing information about the samples in the experiment.",
            )
            .in_section("Input/output options"),
        )
        .param(
            ParameterDescriptor::optional(
                "se_reads",
                ParamType::Bool,
                "activate when using single end reads input",
            ),
        )
        .param(
            ParameterDescriptor::required(
                "outdir",
                ParamType::Directory,
                "The output directory where the results will be saved. You have to use absolute paths to storage on Cloud infrastructure.",
            )
            .output(),
        )
        .param(
            ParameterDescriptor::optional(
                "email",
                ParamType::Str,
                "Email address for completion summary.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "multiqc_title",
                ParamType::Str,
                "MultiQC report title. Printed as page header, used for filename if not otherwise specified.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_qc",
                ParamType::Bool,
                "Skip all QC steps except for MultiQC.",
            )
            .in_section("Quality control options"),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_fastqc",
                ParamType::Bool,
                "Skip FastQC.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "clip_r1",
                ParamType::Str,
                "Instructs Trim Galore to remove bp from the 5' end of read 1 (or single-end reads).",
            )
            .in_section("trimming options"),
        )
        .param(
            ParameterDescriptor::optional(
                "clip_r2",
                ParamType::Str,
                "Instructs Trim Galore to remove bp from the 5' end of read 2 (paired-end reads only).",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "three_prime_clip_r1",
                ParamType::Str,
                "Instructs Trim Galore to remove bp from the 3' end of read 1 AFTER adapter/quality trimming has been performed.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "three_prime_clip_r2",
                ParamType::Str,
                "Instructs Trim Galore to remove bp from the 3' end of read 2 AFTER adapter/quality trimming has been performed.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "save_trimmed",
                ParamType::Bool,
                "Save the trimmed FastQ files in the results directory.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "trim_nextseq",
                ParamType::Str,
                "Instructs Trim Galore to apply the --nextseq=X option, to trim based on quality after removing poly-G tails.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_trimming",
                ParamType::Bool,
                "Skip the adapter trimming step.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "sequence_filter",
                ParamType::Str,
                "Fasta file with sequences to filter away before running assembly etc..",
            )
            .in_section("Filtering options"),
        )
        .param(
            ParameterDescriptor::optional(
                "bbnorm",
                ParamType::Bool,
                "Perform normalization to reduce sequencing depth.",
            )
            .in_section("Digital normalization options"),
        )
        .param(
            ParameterDescriptor::optional(
                "bbnorm_target",
                ParamType::Int,
                "Reduce the number of reads for assembly average coverage of this number.",
            )
            .with_default(ParamValue::Int(100)),
        )
        .param(
            ParameterDescriptor::optional(
                "bbnorm_min",
                ParamType::Int,
                "Reads with an apparent depth of under nx will be presumed to be errors and discarded",
            )
            .with_default(ParamValue::Int(5)),
        )
        .param(
            ParameterDescriptor::optional(
                "save_bbnorm_fastq",
                ParamType::Bool,
                "save the resulting fastq files from normalization",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "assembler",
                ParamType::Str,
                "Specify which assembler you would like to run, possible alternatives: megahit, rnaspades. default: megahit",
            )
            .with_default(ParamValue::Str("megahit".to_string()))
            .in_section("Assembler options"),
        )
        .param(
            ParameterDescriptor::optional(
                "assembly",
                ParamType::File,
                "Path to a fasta file with a finished assembly. Assembly will be skipped by the pipeline.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "min_contig_length",
                ParamType::Int,
                "Filter out contigs shorter than this.",
            )
            .with_default(ParamValue::Int(0)),
        )
        .param(
            ParameterDescriptor::optional(
                "save_bam",
                ParamType::Bool,
                "Save the bam files from mapping",
            )
            .in_section("Mapping options"),
        )
        .param(
            ParameterDescriptor::optional(
                "save_samtools",
                ParamType::Bool,
                "Save the output from samtools",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "protein_fasta",
                ParamType::Str,
                "Path to a protein fasta file",
            )
            .in_section("Orf Caller options"),
        )
        .param(
            ParameterDescriptor::optional(
                "gff",
                ParamType::Str,
                "Path to a gff file",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "orf_caller",
                ParamType::Str,
                "Specify which ORF caller you would like to run, possible alternatives: prodigal, prokka, transdecoder, default: prodigal.",
            )
            .with_default(ParamValue::Str("prodigal".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "prodigal_trainingfile",
                ParamType::Str,
                "Specify a training file for prodigal. By default prodigal will learn from the input sequences",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_eggnog",
                ParamType::Bool,
                "Skip EGGNOG functional annotation",
            )
            .with_default(ParamValue::Bool(false))
            .in_section("Functional annotation options"),
        )
        .param(
            ParameterDescriptor::optional(
                "eggnog_dbpath",
                ParamType::Str,
                "Specify EGGNOG database path",
            )
            .with_default(ParamValue::Str("eggnog".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_kofamscan",
                ParamType::Bool,
                "skip kofamscan run",
            )
            .with_default(ParamValue::Bool(false)),
        )
        .param(
            ParameterDescriptor::optional(
                "kofam_dir",
                ParamType::Str,
                "Path to a directory with KOfam files. Will be created if it doesn't exist.",
            )
            .with_default(ParamValue::Str("./kofam/".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "hmmdir",
                ParamType::Directory,
                "Directory with hmm files which will be searched for among ORFs",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "hmmfiles",
                ParamType::File,
                "Comma-separated list of hmm files which will be searched for among ORFs",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "hmmpattern",
                ParamType::Str,
                "specify which pattern hmm files end with",
            )
            .with_default(ParamValue::Str("*.hmm".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "skip_eukulele",
                ParamType::Bool,
                "skip eukulele run",
            )
            .with_default(ParamValue::Bool(false))
            .in_section("Taxonomy annotation options"),
        )
        .param(
            ParameterDescriptor::optional(
                "eukulele_method",
                ParamType::Str,
                "Specify which method to use for EUKulele. the alternatives are: mets (metatranscriptomics) or  mags (Metagenome Assembled Genomes). default: mets",
            )
            .with_default(ParamValue::Str("mets".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "eukulele_db",
                ParamType::Str,
                "EUKulele database.",
            ),
        )
        .param(
            ParameterDescriptor::optional(
                "eukulele_dbpath",
                ParamType::Str,
                "EUKulele database folder.",
            )
            .with_default(ParamValue::Str("./eukulele/".to_string())),
        )
        .param(
            ParameterDescriptor::optional(
                "multiqc_methods_description",
                ParamType::Str,
                "Custom MultiQC yaml file containing HTML including a methods description.",
            )
            .in_section("Generic options"),
        )
        .build()
}
