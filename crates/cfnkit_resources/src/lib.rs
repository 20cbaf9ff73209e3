//! # cfnkit_resources
//!
//! Resource kind catalogue for cfnkit.
//!
//! Each kind is a plain serde struct declared with
//! [`cfnkit_template::resource_kind!`]. The template engine does not depend on
//! this crate; [`catalog`] is how callers make these kinds known when decoding
//! raw templates.

pub mod ec2;
pub mod eks;
pub mod emr;
pub mod iam;
pub mod logs;

use cfnkit_template::KindCatalog;

pub use ec2::{Ec2InternetGateway, Ec2SecurityGroup, Ec2Subnet, Ec2Vpc, IngressRule};
pub use eks::{EksCluster, ResourcesVpcConfig};
pub use emr::{EmrStep, HadoopJarStepConfig, KeyValue};
pub use iam::{IamPolicy, IamRole};
pub use logs::{LogsMetricFilter, MetricTransformation};

/// A catalogue with every kind defined in this crate.
pub fn catalog() -> KindCatalog {
    let mut catalog = KindCatalog::new();
    catalog
        .register::<Ec2Vpc>()
        .register::<Ec2Subnet>()
        .register::<Ec2InternetGateway>()
        .register::<Ec2SecurityGroup>()
        .register::<EksCluster>()
        .register::<EmrStep>()
        .register::<IamRole>()
        .register::<LogsMetricFilter>();
    catalog
}
