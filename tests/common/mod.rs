//! Shared dataset fixture: writes every table as a CSV file into a temp dir

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const TAGS: &str = "\
tags_tag_id,tags_tag_name
1,college
2,nursing
3,engineering
";

pub const GROUPS: &str = "\
groups_id,groups_group_type
g1,youth program
g2,cause
";

pub const STUDENTS: &str = "\
students_id,students_location,students_date_joined
s1,\"Boston, Massachusetts\",2016-04-26 16:02:45 UTC+0000
s2,,2017-01-12 09:15:00 UTC+0000
";

pub const PROFESSIONALS: &str = "\
professionals_id,professionals_location,professionals_industry,professionals_headline,professionals_date_joined
p1,\"Chicago, Illinois\",Healthcare,Registered Nurse,2011-10-05 20:35:19 UTC+0000
p2,,Engineering,,2012-03-01 10:00:00 UTC+0000
";

pub const QUESTIONS: &str = "\
questions_id,questions_author_id,questions_date_added,questions_title,questions_body
q1,s1,2016-04-26 19:08:14 UTC+0000,How do I become a nurse?,\"I like helping people, what should I study?\"
q2,s2,2017-02-01 12:00:00 UTC+0000,Is engineering hard?,\"Asking for a \"\"friend\"\".
Thanks!\"
q3,s1,2017-05-05 08:30:00 UTC+0000,Which college?,Nobody has answered this yet
";

pub const ANSWERS: &str = "\
answers_id,answers_author_id,answers_question_id,answers_date_added,answers_body
a1,p1,q1,2016-04-29 19:40:14 UTC+0000,Study nursing.
a2,p2,q1,2016-05-01 10:00:00 UTC+0000,Volunteer at a hospital.
a3,p1,q2,2017-02-02 08:00:00 UTC+0000,It is rewarding.
a4,p1,q2,2017-02-03 09:00:00 UTC+0000,Start with math.
a5,p2,q1,2016-05-02 11:00:00 UTC+0000,Talk to nurses.
";

pub const EMAILS: &str = "\
emails_id,emails_recipient_id,emails_date_sent,emails_frequency_level
e1,p1,2016-04-27 00:00:00 UTC+0000,email_notification_daily
e2,p2,2017-02-01 18:00:00 UTC+0000,email_notification_immediate
e3,p1,2017-05-06 00:00:00 UTC+0000,email_notification_weekly
e4,p2,2016-04-27 00:00:00 UTC+0000,email_notification_daily
";

pub const TAG_USERS: &str = "\
tag_users_tag_id,tag_users_user_id
2,s1
2,p1
3,p2
";

pub const GROUP_MEMBERSHIPS: &str = "\
group_memberships_group_id,group_memberships_user_id
g1,s1
g1,s2
g2,p2
";

pub const SCHOOL_MEMBERSHIPS: &str = "\
school_memberships_school_id,school_memberships_user_id
100,s1
200,p1
100,p2
";

pub const TAG_QUESTIONS: &str = "\
tag_questions_tag_id,tag_questions_question_id
2,q1
1,q1
3,q2
1,q3
";

pub const MATCHES: &str = "\
matches_email_id,matches_question_id
e1,q1
e2,q2
e3,q3
e4,q1
";

/// Every table of the small reference dataset, by file name
pub fn tables() -> Vec<(&'static str, &'static str)> {
    vec![
        ("tags.csv", TAGS),
        ("groups.csv", GROUPS),
        ("students.csv", STUDENTS),
        ("professionals.csv", PROFESSIONALS),
        ("questions.csv", QUESTIONS),
        ("answers.csv", ANSWERS),
        ("emails.csv", EMAILS),
        ("tag_users.csv", TAG_USERS),
        ("group_memberships.csv", GROUP_MEMBERSHIPS),
        ("school_memberships.csv", SCHOOL_MEMBERSHIPS),
        ("tag_questions.csv", TAG_QUESTIONS),
        ("matches.csv", MATCHES),
    ]
}

/// Write the reference dataset into a fresh temp dir
pub fn dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in tables() {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// Replace one table of a dataset dir
pub fn overwrite(dir: &Path, file_name: &str, content: &str) {
    fs::write(dir.join(file_name), content).unwrap();
}

/// Append rows to one table of a dataset dir
pub fn append(dir: &Path, file_name: &str, rows: &str) {
    let path = dir.join(file_name);
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str(rows);
    fs::write(path, content).unwrap();
}
