use crate::config::Language;

pub fn help_text(language: Language) -> &'static str {
    match language {
        Language::Ko => HELP_KO,
        Language::En => HELP_EN,
    }
}

const HELP_KO: &str = "\
자연어로 요청하면 알맞은 작업으로 연결됩니다.
  프로젝트 분석해줘              현재 프로젝트 전체 분석
  app.js 분석해줘                파일 하나 분석
  app.js 수정해줘: <요청>        백업 후 파일 수정
  리드미 작성해줘                README_<시각>.md 생성
  <질문> 검색해줘                웹 검색 기반 답변
바로 실행되는 명령:
  help | tree | settings | models
  set <model|language|webSearchModel|temperature> <값>
  backup list | backup restore <파일> | backup cleanup [--keep N | --older-than 일수]
  exit | quit";

const HELP_EN: &str = "\
Ask in plain language and the request is routed to the right workflow.
  analyze the project            whole-project analysis
  analyze app.js                 single-file analysis
  modify app.js: <request>       back up, then rewrite the file
  write a readme                 creates README_<timestamp>.md
  search <question>              web-search backed answer
Direct commands:
  help | tree | settings | models
  set <model|language|webSearchModel|temperature> <value>
  backup list | backup restore <file> | backup cleanup [--keep N | --older-than DAYS]
  exit | quit";
